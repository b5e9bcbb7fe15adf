//! The `quizrun init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    if Path::new("quizrun.toml").exists() {
        println!("quizrun.toml already exists, skipping.");
    } else {
        std::fs::write("quizrun.toml", SAMPLE_CONFIG)?;
        println!("Created quizrun.toml");
    }

    std::fs::create_dir_all("question-sets")?;
    let example_path = Path::new("question-sets/example.toml");
    if example_path.exists() {
        println!("question-sets/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_QUESTION_SET)?;
        println!("Created question-sets/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: quizrun validate --questions question-sets/example.toml");
    println!("  2. Run: quizrun run");
    println!("  3. Or generate a fresh set: quizrun generate --output question-sets/maths.toml");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizrun configuration

question_set = "question-sets/example.toml"
output_dir = "./quizrun-results"
formats = ["json", "html"]
tick_interval_ms = 1000
show_timer = true
auto_advance = true
"#;

const EXAMPLE_QUESTION_SET: &str = r#"[quiz]
id = "example"
name = "Example Quiz"
description = "A short quiz covering every answer shape"

[[questions]]
id = "add"
type = "single"
question_text = "4821 + 3175 = ?"
correct_answer = 7996
category = "Arithmetic"

[[questions]]
id = "divide"
type = "dual"
question_text = "Divide 1234 by 7. What is the Quotient and Remainder?"
correct_answer = { quotient = 176, remainder = 2 }
category = "Arithmetic"

[[questions]]
id = "factors"
type = "text"
question_text = "List all prime factors of 84 (comma separated)"
correct_answer = "2,2,3,7"
category = "Number Theory"

[[questions]]
id = "percent"
type = "text"
question_text = "Convert 37.5% to fraction (as a/b, lowest terms)"
correct_answer = "3/8"
category = "Fractions & %"

[[questions]]
id = "equation"
type = "single"
question_text = "Solve for x: 4x + 3 = 17"
correct_answer = 3.5
rule = "numeric"
category = "Algebra"
"#;
