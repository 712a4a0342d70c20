use std::fmt::Debug;

use relex_automata::{determinize::determinize, Compiler, DFA, NFA, Symbol};

fn main() {
    println!("relex automata inspector");
    println!("========================");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let patterns: Vec<&str> = if args.is_empty() {
        vec!["a", "a*", "a+", "a?", "a|b", "[abc]", "(a|b)*abb", "11+|01|10"]
    } else {
        args.iter().map(|s| s.as_str()).collect()
    };

    for pattern in patterns {
        println!("\n=== Pattern: {:?} ===", pattern);

        let nfa = match Compiler::new().build(pattern) {
            Ok(nfa) => nfa,
            Err(e) => {
                match e.syntax_error() {
                    Some(syntax) => println!("{}", syntax),
                    None => println!("Failed to compile: {}", e),
                }
                continue;
            }
        };
        println!("\n--- Thompson NFA ---");
        print_nfa(&nfa);

        let dfa = match determinize(&nfa) {
            Ok(dfa) => dfa,
            Err(e) => {
                println!("Failed to determinize: {}", e);
                continue;
            }
        };
        println!("\n--- Subset construction ---");
        print_dfa(&dfa);

        match dfa.minimize() {
            Ok(min) => {
                println!("\n--- Minimized, relabelled ---");
                print_dfa(&min.relabel());
            }
            Err(e) => println!("Failed to minimize: {}", e),
        }
    }
}

fn print_nfa(nfa: &NFA) {
    println!("Alphabet: {:?}", nfa.alphabet());
    println!("Start state: {}", nfa.start());
    println!("Accepting states: {:?}", nfa.accepting());
    println!("Transitions:");
    for (from, sym, to) in nfa.transitions() {
        match sym {
            Symbol::Epsilon => println!("  {} -ε-> {}", from, to),
            Symbol::Char(c) => println!("  {} -{:?}-> {}", from, c, to),
        }
    }
}

fn print_dfa<S: Clone + Ord + Debug>(dfa: &DFA<S>) {
    println!("States: {}", dfa.state_len());
    println!("Start state: {:?}", dfa.start());
    println!("Accepting states: {:?}", dfa.accepting());
    println!("Transitions:");
    for (from, c, to) in dfa.transitions() {
        println!("  {:?} -{:?}-> {:?}", from, c, to);
    }
}
