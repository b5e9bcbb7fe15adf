//! The `quizrun generate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizrun_core::generator::MathGenerator;
use quizrun_core::parser::write_question_set;

pub fn execute(output: PathBuf, seed: Option<u64>, name: String) -> Result<()> {
    let seed = seed.unwrap_or_else(rand::random);
    let mut generator = MathGenerator::new(seed);
    let set = generator.question_set(&format!("maths-{seed}"), &name);

    write_question_set(&set, &output)?;
    tracing::debug!(seed, questions = set.questions.len(), "question set generated");

    println!(
        "Generated {} questions (seed {seed}): {}",
        set.questions.len(),
        output.display()
    );
    Ok(())
}
