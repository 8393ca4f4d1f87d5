//! Interactive REPL for Ember: reads one line at a time, evaluates it
//! against a single persistent [`Session`], and prints whatever it printed
//! or the diagnostics it raised.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};

use crate::colors::{bold, cyan, gray, green, red};
use crate::Session;

pub fn run_repl() -> RlResult<()> {
    println!("{}", bold(&cyan("Ember REPL")));
    println!(
        "{}\n",
        gray("Type :help for available commands, :quit to exit.")
    );

    let mut editor = DefaultEditor::new()?;
    let history_path = history_path();
    if let Some(path) = &history_path {
        let _ = editor.load_history(path);
    }

    let mut session = Session::new();

    loop {
        match editor.readline(&format!("{} ", green("ember>"))) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(trimmed);

                match trimmed {
                    ":quit" | ":q" => break,
                    ":help" | ":h" => {
                        print_help();
                        continue;
                    }
                    ":clear" => {
                        print!("\x1b[2J\x1b[H");
                        std::io::stdout().flush().ok();
                        continue;
                    }
                    _ => {}
                }

                eval_and_print(&mut session, trimmed);
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", gray("(Ctrl-C to exit)"));
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{} {err:?}", red("Error:"));
                break;
            }
        }
    }

    if let Some(path) = &history_path {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        let _ = editor.save_history(path);
    }

    println!("\n{}", cyan("Goodbye!"));
    Ok(())
}

fn eval_and_print(session: &mut Session, line: &str) {
    let source = if line.ends_with(';') || line.ends_with('}') {
        line.to_string()
    } else {
        format!("{line};")
    };
    let result = session.eval_line(&source);
    for line in &result.output {
        println!("{line}");
    }
    for error in &result.errors {
        eprintln!("{}", red(&error.to_string()));
    }
}

fn history_path() -> Option<PathBuf> {
    let home = std::env::var("HOME").ok()?;
    let mut path = PathBuf::from(home);
    path.push(".ember");
    path.push("repl_history");
    Some(path)
}

fn print_help() {
    println!("{}", bold("Commands:"));
    println!("  :help        show this message");
    println!("  :clear       clear the screen");
    println!("  :quit        exit the REPL");
    println!();
    println!("Anything else is evaluated as Ember source; a trailing ';' is added");
    println!("automatically if the line doesn't already end in one.");
}
