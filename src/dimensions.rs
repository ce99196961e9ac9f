use crate::error::SheetError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDims {
    pub num_choices: u32,
    pub num_questions: u32,
}

/// Parses an exam geometry string: one "choices,questions" pair per table,
/// pairs separated by ';' (for example "4,10;4,9").
pub fn parse_dimensions(text: &str) -> Result<Vec<TableDims>, SheetError> {
    let bad = || SheetError::BadDimensions(text.to_string());
    let mut dimensions = Vec::new();
    for group in text.split(';') {
        let mut parts = group.split(',');
        let (Some(choices), Some(questions), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(bad());
        };
        let num_choices: u32 = choices.trim().parse().map_err(|_| bad())?;
        let num_questions: u32 = questions.trim().parse().map_err(|_| bad())?;
        if num_choices == 0 || num_questions == 0 {
            return Err(bad());
        }
        dimensions.push(TableDims {
            num_choices,
            num_questions,
        });
    }
    Ok(dimensions)
}

/// Folds per-table dimensions into the (num_questions, num_choices) pair the
/// layout pipeline takes. Every table must declare the same choice count.
pub fn merge_dimensions(dimensions: &[TableDims]) -> Result<(u32, u32), SheetError> {
    let Some(first) = dimensions.first() else {
        return Err(SheetError::BadDimensions(String::new()));
    };
    if dimensions
        .iter()
        .any(|dims| dims.num_choices != first.num_choices)
    {
        return Err(SheetError::MixedChoiceCounts);
    }
    let num_questions = dimensions
        .iter()
        .try_fold(0u32, |total, dims| total.checked_add(dims.num_questions))
        .ok_or(SheetError::SheetTooLarge)?;
    Ok((num_questions, first.num_choices))
}
