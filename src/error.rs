use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("question count must be at least 1")]
    NoQuestions,

    #[error("choice count must be at least 1")]
    NoChoices,

    #[error("table count {0} is outside the supported range 1..=4")]
    UnsupportedTableCount(u32),

    #[error("{num_tables} tables would leave some empty with only {num_questions} question(s)")]
    EmptyTable { num_questions: u32, num_tables: u32 },

    #[error("unknown model letter '{0}', expected 'A' through 'H'")]
    UnknownModel(char),

    #[error("surface {width}x{height}px cannot host a {total_columns}x{total_rows} cell grid")]
    SurfaceTooSmall {
        width: i32,
        height: i32,
        total_columns: u32,
        total_rows: u32,
    },

    #[error("question and choice counts overflow the supported grid size")]
    SheetTooLarge,

    #[error("bad dimensions '{0}': expected \"choices,questions\" groups separated by ';'")]
    BadDimensions(String),

    #[error("all tables must use the same number of choices")]
    MixedChoiceCounts,

    #[error("output pattern '{0}' must contain {{model}} when generating more than one sheet")]
    AmbiguousOutputPattern(String),

    #[error("invalid exam file: {0}")]
    BadExamFile(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
