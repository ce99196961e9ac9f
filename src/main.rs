// markgrid: generate machine-readable multiple-choice answer sheets

use clap::{ArgGroup, Parser, ValueEnum};
use markgrid::{
    AnswerBoxes, Canvas, Model, SheetError, Size, document_to_pdf, merge_dimensions,
    parse_dimensions,
};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Generate multiple-choice answer sheets as PDF",
    group(ArgGroup::new("source").args(["questions", "dimensions", "exam"]).required(true))
)]
struct Args {
    /// Number of questions
    #[arg(long, requires = "choices")]
    questions: Option<u32>,

    /// Choices per question
    #[arg(long, requires = "questions")]
    choices: Option<u32>,

    /// Per-table sizes as "choices,questions" groups, e.g. "4,10;4,9"
    #[arg(long)]
    dimensions: Option<String>,

    /// Exam description file (JSON with questions, choices and models)
    #[arg(long)]
    exam: Option<PathBuf>,

    /// Models to generate, e.g. A,B,C (default A)
    #[arg(long, value_delimiter = ',')]
    models: Option<Vec<Model>>,

    /// Paper preset for the sheet surface
    #[arg(long, value_enum, default_value = "a4")]
    paper: Paper,

    /// Surface width in pixels, overrides --paper
    #[arg(long, requires = "height")]
    width: Option<i32>,

    /// Surface height in pixels, overrides --paper
    #[arg(long, requires = "width")]
    height: Option<i32>,

    /// Output filename pattern; {model} expands to the model letter
    #[arg(long, default_value = "answer-sheet-{model}.pdf")]
    output: String,

    /// Draw a red outline around each answer table
    #[arg(long)]
    debug_frame: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Paper {
    A4,
    Letter,
}

/// Exam description file: {"questions": 20, "choices": 4, "models": ["A", "B"]}
#[derive(Debug, Deserialize)]
struct ExamFile {
    questions: u32,
    choices: u32,
    #[serde(default)]
    models: Vec<String>,
}

fn main() {
    if let Err(error) = run() {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), SheetError> {
    let args = Args::parse();

    let (num_questions, num_choices, file_models) = load_exam(&args)?;
    let models = match args.models {
        Some(models) => models,
        None if !file_models.is_empty() => file_models,
        None => vec![Model::A],
    };
    if models.len() > 1 && !args.output.contains("{model}") {
        return Err(SheetError::AmbiguousOutputPattern(args.output));
    }

    let surface = match (args.width, args.height) {
        (Some(width), Some(height)) => Size::new(width, height),
        _ => match args.paper {
            Paper::A4 => Size::a4(),
            Paper::Letter => Size::letter(),
        },
    };

    let boxes = AnswerBoxes::new(num_questions, num_choices)?.debug_frame(args.debug_frame);
    let geometry = boxes.geometry();
    println!(
        "{} question(s), {} choice(s), {} table(s): {:?}",
        geometry.num_questions, geometry.num_choices, geometry.num_tables,
        geometry.questions_per_table
    );

    for model in models {
        let mut canvas = Canvas::new(surface);
        boxes.draw(&mut canvas, model)?;
        let document = canvas.finish();
        let path = args.output.replace("{model}", &model.letter().to_string());
        fs::write(&path, document_to_pdf(&document))?;
        println!("✓ Generated: {path}");
    }
    Ok(())
}

fn load_exam(args: &Args) -> Result<(u32, u32, Vec<Model>), SheetError> {
    if let Some(path) = &args.exam {
        let text = fs::read_to_string(path)?;
        let exam: ExamFile = serde_json::from_str(&text)?;
        let models = exam
            .models
            .iter()
            .map(|name| name.parse())
            .collect::<Result<Vec<Model>, _>>()?;
        return Ok((exam.questions, exam.choices, models));
    }
    if let Some(text) = &args.dimensions {
        let tables = parse_dimensions(text)?;
        let (questions, choices) = merge_dimensions(&tables)?;
        return Ok((questions, choices, Vec::new()));
    }
    match (args.questions, args.choices) {
        (Some(questions), Some(choices)) => Ok((questions, choices, Vec::new())),
        _ => Err(SheetError::NoQuestions),
    }
}
