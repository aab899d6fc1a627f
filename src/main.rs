mod cli;

use clap::Parser;
use colored::Colorize;
use rand::Rng;
use std::io::{self, BufRead, Write};

use ipquizgenerator::error::NetError;
use ipquizgenerator::quiz::{generate_quiz_question, QuestionKind, QuizQuestion};

const CHOICE_LABELS: [char; 4] = ['1', '2', '3', '4'];

fn parse_kind(kind: &Option<String>) -> Result<Option<QuestionKind>, NetError> {
    kind.as_deref().map(str::parse).transpose()
}

fn next_question(rng: &mut impl Rng, kind: Option<QuestionKind>) -> QuizQuestion {
    let kind = kind.unwrap_or_else(|| QuestionKind::random(rng));
    generate_quiz_question(rng, kind)
}

fn print_question(idx: u32, question: &QuizQuestion, solutions: bool) {
    println!(
        "{} {} {}",
        format!("{:3}.", idx + 1).red(),
        format!("[{}]", question.kind.label()).green(),
        question.question.blue()
    );
    for (i, choice) in question.choices.iter().enumerate() {
        println!("     {} {}", format!("{})", CHOICE_LABELS[i]).cyan(), choice);
    }

    if solutions {
        println!(
            "     {} {}",
            "Antwort:".yellow(),
            question.choices[question.correct_answer].yellow()
        );
        for line in question.explanation.lines() {
            println!("     {}", line.dimmed());
        }
    }
    println!();
}

fn run_gen(rng: &mut impl Rng, count: u32, kind: Option<QuestionKind>, solutions: bool) {
    for idx in 0..count {
        let question = next_question(rng, kind);
        print_question(idx, &question, solutions);
    }
}

fn read_answer(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    let _ = io::stdout().flush();

    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_owned()),
    }
}

fn run_drill(rng: &mut impl Rng, count: u32, kind: Option<QuestionKind>) {
    let mut score = 0u32;
    let mut answered = 0u32;

    'outer: for idx in 0..count {
        let question = next_question(rng, kind);
        print_question(idx, &question, false);

        let picked = loop {
            let input = match read_answer("Antwort [1-4], q zum Beenden: ") {
                Some(input) => input,
                None => break 'outer,
            };
            if input == "q" {
                break 'outer;
            }
            match input.parse::<usize>() {
                Ok(n) if (1..=4).contains(&n) => break n - 1,
                _ => println!("{}", "Bitte 1 bis 4 eingeben.".red()),
            }
        };

        answered += 1;
        if picked == question.correct_answer {
            score += 1;
            println!("{}", "Richtig!".green());
        } else {
            println!(
                "{} Richtig wäre: {}",
                "Falsch.".red(),
                question.choices[question.correct_answer].yellow()
            );
        }
        for line in question.explanation.lines() {
            println!("{}", line.dimmed());
        }
        println!();
    }

    println!(
        "Ergebnis: {} von {} richtig",
        score.to_string().green(),
        answered
    );
}

fn run_kinds() {
    for kind in QuestionKind::ALL {
        println!("{:18} {}", kind.id().cyan(), kind.label());
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    let args = cli::Command::parse();
    let mut rng = rand::thread_rng();

    let result = match args {
        cli::Command::Gen {
            count,
            kind,
            solutions,
        } => parse_kind(&kind).map(|kind| run_gen(&mut rng, count, kind, solutions)),
        cli::Command::Drill { count, kind } => {
            parse_kind(&kind).map(|kind| run_drill(&mut rng, count, kind))
        }
        cli::Command::Kinds => {
            run_kinds();
            Ok(())
        }
    };

    if let Err(err) = result {
        eprintln!("{} {}", "Fehler:".red(), err);
        std::process::exit(2);
    }
}
