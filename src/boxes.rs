use log::trace;

use crate::canvas::{Canvas, TextAlign};
use crate::error::SheetError;
use crate::geometry::{CellSize, Geometry, GeometryAnalyzer};
use crate::infobits::{self, Model};
use crate::types::{Color, Point, Px};

const FRAME_COLOR: Color = Color {
    r: 1.0,
    g: 0.0,
    b: 0.0,
};

/// One table of the sheet: its grid, question numbers, choice letters and
/// calibration marks. Transient; holds nothing beyond its constructor
/// arguments.
pub struct AnswerBox {
    num_questions: u32,
    num_choices: u32,
    first_question_number: u32,
    num_digits: u32,
    extra_bottom_line: bool,
    debug_frame: bool,
}

impl AnswerBox {
    pub fn new(
        num_questions: u32,
        num_choices: u32,
        first_question_number: u32,
        num_digits: u32,
        extra_bottom_line: bool,
    ) -> Self {
        Self {
            num_questions,
            num_choices,
            first_question_number,
            num_digits,
            extra_bottom_line,
            debug_frame: false,
        }
    }

    pub fn with_debug_frame(mut self, enabled: bool) -> Self {
        self.debug_frame = enabled;
        self
    }

    pub fn draw(
        &self,
        canvas: &mut Canvas,
        top_left: Point,
        cell: CellSize,
        infobits_fragment: &str,
    ) {
        let bottom_right = Point::new(
            top_left.x + cell.width * (self.num_choices as i32).saturating_add(1),
            top_left.y + cell.height * (self.num_questions as i32).saturating_add(3),
        );
        let left_x = top_left.x + cell.width;
        let right_x = left_x + cell.width * self.num_choices as i32;
        let top_y = top_left.y + cell.height;
        let bottom_y = top_y + cell.height * self.num_questions as i32;
        self.draw_lines(canvas, cell, left_x, right_x, top_y, bottom_y);
        if self.debug_frame {
            self.draw_frame(canvas, top_left, bottom_right);
        }
        self.draw_question_numbers(canvas, cell, top_left);
        self.draw_choice_letters(canvas, cell, top_left);
        self.draw_infobits(canvas, cell, top_left, infobits_fragment);
    }

    fn draw_lines(
        &self,
        canvas: &mut Canvas,
        cell: CellSize,
        left_x: Px,
        right_x: Px,
        top_y: Px,
        bottom_y: Px,
    ) {
        canvas.begin_path();
        for i in 0..=self.num_choices as i32 {
            let x = left_x + cell.width * i;
            canvas.move_to(x, top_y);
            canvas.line_to(x, bottom_y);
        }
        // Tables with fewer rows than the tallest one close with a second
        // bottom line so every table shares the same lower border.
        let num_lines = if self.extra_bottom_line {
            self.num_questions.saturating_add(2)
        } else {
            self.num_questions.saturating_add(1)
        };
        for i in 0..num_lines as i32 {
            let y = top_y + cell.height * i;
            canvas.move_to(left_x, y);
            canvas.line_to(right_x, y);
        }
        canvas.stroke();
    }

    fn draw_frame(&self, canvas: &mut Canvas, top_left: Point, bottom_right: Point) {
        canvas.save_state();
        canvas.set_stroke_color(FRAME_COLOR);
        canvas.begin_path();
        canvas.move_to(top_left.x, top_left.y);
        canvas.line_to(bottom_right.x, top_left.y);
        canvas.line_to(bottom_right.x, bottom_right.y);
        canvas.line_to(top_left.x, bottom_right.y);
        canvas.line_to(top_left.x, top_left.y);
        canvas.stroke();
        canvas.restore_state();
    }

    fn draw_question_numbers(&self, canvas: &mut Canvas, cell: CellSize, top_left: Point) {
        canvas.set_text_align(TextAlign::Right);
        canvas.set_font_size(self.font_size(cell));
        let offset = Point::new(cell.width * 0.9, cell.height * 0.9);
        let max_width = cell.width * 0.8;
        for i in 1..=self.num_questions {
            let number = self.first_question_number.saturating_add(i - 1);
            let x = top_left.x + offset.x;
            let y = top_left.y + offset.y + cell.height * i as i32;
            canvas.draw_text(x, y, number.to_string(), Some(max_width));
        }
    }

    fn draw_choice_letters(&self, canvas: &mut Canvas, cell: CellSize, top_left: Point) {
        canvas.set_text_align(TextAlign::Center);
        canvas.set_font_size(self.font_size(cell));
        let offset = Point::new(cell.width * 0.5, cell.height * 0.9);
        let max_width = cell.width * 0.8;
        for i in 1..=self.num_choices {
            let letter = char::from_u32(('A' as u32).saturating_add(i - 1)).unwrap_or('?');
            let x = top_left.x + offset.x + cell.width * i as i32;
            let y = top_left.y + offset.y;
            canvas.draw_text(x, y, letter.to_string(), Some(max_width));
        }
    }

    fn draw_infobits(&self, canvas: &mut Canvas, cell: CellSize, top_left: Point, fragment: &str) {
        let y_up = top_left.y
            + cell.height * (self.num_questions as i32).saturating_add(1)
            + cell.height * 0.2;
        let y_down = y_up + cell.height;
        let size = cell.height * 0.6;
        let x_base = top_left.x + (cell.width - size) / 2;
        for (i, symbol) in fragment.chars().enumerate() {
            let x = x_base + cell.width * (i as i32).saturating_add(1);
            let y = if symbol == 'U' { y_up } else { y_down };
            canvas.fill_rect(x, y, size, size);
        }
    }

    fn font_size(&self, cell: CellSize) -> Px {
        let for_width = cell.width / self.num_digits.max(1) as i32;
        for_width.min(cell.height)
    }
}

/// The full sheet: one answer box per table, numbered left to right, with
/// the model's calibration code split across the tables.
pub struct AnswerBoxes {
    geometry: Geometry,
    debug_frame: bool,
}

impl AnswerBoxes {
    pub fn new(num_questions: u32, num_choices: u32) -> Result<Self, SheetError> {
        Self::with_analyzer(&GeometryAnalyzer::new(), num_questions, num_choices)
    }

    pub fn with_analyzer(
        analyzer: &GeometryAnalyzer,
        num_questions: u32,
        num_choices: u32,
    ) -> Result<Self, SheetError> {
        Ok(Self {
            geometry: analyzer.best_geometry(num_questions, num_choices)?,
            debug_frame: false,
        })
    }

    pub fn debug_frame(mut self, enabled: bool) -> Self {
        self.debug_frame = enabled;
        self
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Draws the sheet for one exam model. All validation happens before
    /// the first command is recorded, so a failed call leaves the canvas
    /// exactly as it was.
    pub fn draw(&self, canvas: &mut Canvas, model: Model) -> Result<(), SheetError> {
        let cell = self.geometry.cell_size(canvas.size())?;
        let top_left = self.geometry.top_left_corner(cell, canvas.size());
        let num_digits = decimal_digits(self.geometry.num_questions);
        let infobits = infobits::encode(model, self.geometry.num_columns as usize);
        let columns_per_table = (self.geometry.num_choices as i32).saturating_add(1);
        let mut first_question_number = 1;
        for (i, &table_questions) in self.geometry.questions_per_table.iter().enumerate() {
            let extra_bottom_line = table_questions < self.geometry.num_rows;
            let box_top_left = Point::new(
                top_left.x + cell.width * columns_per_table * i as i32,
                top_left.y,
            );
            let start = i * self.geometry.num_choices as usize;
            let fragment = &infobits[start..start + self.geometry.num_choices as usize];
            trace!(
                "table {}: {} question(s) from {}, infobits {}",
                i, table_questions, first_question_number, fragment
            );
            AnswerBox::new(
                table_questions,
                self.geometry.num_choices,
                first_question_number,
                num_digits,
                extra_bottom_line,
            )
            .with_debug_frame(self.debug_frame)
            .draw(canvas, box_top_left, cell, fragment);
            first_question_number = first_question_number.saturating_add(table_questions);
        }
        Ok(())
    }
}

fn decimal_digits(value: u32) -> u32 {
    value.checked_ilog10().map_or(1, |log| log + 1)
}
