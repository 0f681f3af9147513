//! The `quizdeck init` command.

use std::path::Path;

use anyhow::Result;

const CONFIG_TEMPLATE: &str = r#"# quizdeck configuration
data_dir = "./data/quizzes"
admin_code = "112233"
"#;

const SAMPLE_QUIZ: &str = r#"{
  "courseCode": "DEMO101",
  "topic": "Getting Started",
  "marks": 3,
  "timeLimit": 5,
  "quizType": "mixed",
  "questions": [
    {
      "id": "demo_1",
      "type": "mcq",
      "text": "Which command lists the stored quizzes?",
      "options": ["quizdeck list", "quizdeck take general", "quizdeck delete"],
      "correctOption": 0
    },
    {
      "id": "demo_2",
      "type": "mcq",
      "text": "What does `quizdeck take course:DEMO101` run?",
      "options": ["One stored quiz", "A cumulative exam for the course", "Nothing"],
      "correctOption": 1,
      "explanation": "Course mode merges every stored DEMO101 quiz into one exam."
    },
    {
      "id": "demo_3",
      "type": "theory",
      "text": "Name the file format quiz documents are stored in.",
      "answer": "json"
    }
  ]
}
"#;

pub fn execute() -> Result<()> {
    if Path::new("quizdeck.toml").exists() {
        println!("quizdeck.toml already exists, skipping.");
    } else {
        std::fs::write("quizdeck.toml", CONFIG_TEMPLATE)?;
        println!("Created quizdeck.toml");
    }

    let sample = Path::new("data/quizzes/DEMO101_Getting_Started.json");
    if sample.exists() {
        println!("{} already exists, skipping.", sample.display());
    } else {
        std::fs::create_dir_all("data/quizzes")?;
        std::fs::write(sample, SAMPLE_QUIZ)?;
        println!("Created {}", sample.display());
    }

    println!("\nNext: `quizdeck list`, then `quizdeck take DEMO101_Getting_Started.json`.");
    Ok(())
}
