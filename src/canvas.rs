use crate::types::{Color, Px, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SaveState,
    RestoreState,
    SetStrokeColor(Color),
    SetFillColor(Color),
    SetTextAlign(TextAlign),
    SetFontSize(Px),
    BeginPath,
    MoveTo {
        x: Px,
        y: Px,
    },
    LineTo {
        x: Px,
        y: Px,
    },
    Stroke,
    FillRect {
        x: Px,
        y: Px,
        width: Px,
        height: Px,
    },
    ClearRect {
        x: Px,
        y: Px,
        width: Px,
        height: Px,
    },
    // y is the alphabetic baseline; how x anchors depends on the text
    // alignment in effect when the command was recorded.
    DrawText {
        x: Px,
        y: Px,
        text: String,
        max_width: Option<Px>,
    },
}

#[derive(Debug, Clone)]
pub struct Document {
    pub size: Size,
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone)]
struct GraphicsState {
    stroke_color: Color,
    fill_color: Color,
    text_align: TextAlign,
    font_size: Px,
}

impl GraphicsState {
    fn new() -> Self {
        Self {
            stroke_color: Color::BLACK,
            fill_color: Color::BLACK,
            text_align: TextAlign::Left,
            font_size: Px::from_i32(10),
        }
    }
}

pub struct Canvas {
    size: Size,
    commands: Vec<Command>,
    state_stack: Vec<GraphicsState>,
    current_state: GraphicsState,
}

impl Canvas {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            commands: Vec::new(),
            state_stack: Vec::new(),
            current_state: GraphicsState::new(),
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn stroke_color(&self) -> Color {
        self.current_state.stroke_color
    }

    pub fn fill_color(&self) -> Color {
        self.current_state.fill_color
    }

    pub fn text_align(&self) -> TextAlign {
        self.current_state.text_align
    }

    pub fn font_size(&self) -> Px {
        self.current_state.font_size
    }

    pub fn save_state(&mut self) {
        self.state_stack.push(self.current_state.clone());
        self.commands.push(Command::SaveState);
    }

    pub fn restore_state(&mut self) {
        if let Some(state) = self.state_stack.pop() {
            self.current_state = state;
            self.commands.push(Command::RestoreState);
        }
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        if self.current_state.stroke_color == color {
            return;
        }
        self.current_state.stroke_color = color;
        self.commands.push(Command::SetStrokeColor(color));
    }

    pub fn set_fill_color(&mut self, color: Color) {
        if self.current_state.fill_color == color {
            return;
        }
        self.current_state.fill_color = color;
        self.commands.push(Command::SetFillColor(color));
    }

    pub fn set_text_align(&mut self, align: TextAlign) {
        if self.current_state.text_align == align {
            return;
        }
        self.current_state.text_align = align;
        self.commands.push(Command::SetTextAlign(align));
    }

    pub fn set_font_size(&mut self, size: Px) {
        if self.current_state.font_size == size {
            return;
        }
        self.current_state.font_size = size;
        self.commands.push(Command::SetFontSize(size));
    }

    pub fn begin_path(&mut self) {
        self.commands.push(Command::BeginPath);
    }

    pub fn move_to(&mut self, x: Px, y: Px) {
        self.commands.push(Command::MoveTo { x, y });
    }

    pub fn line_to(&mut self, x: Px, y: Px) {
        self.commands.push(Command::LineTo { x, y });
    }

    pub fn stroke(&mut self) {
        self.commands.push(Command::Stroke);
    }

    pub fn fill_rect(&mut self, x: Px, y: Px, width: Px, height: Px) {
        self.commands.push(Command::FillRect {
            x,
            y,
            width,
            height,
        });
    }

    pub fn clear_rect(&mut self, x: Px, y: Px, width: Px, height: Px) {
        self.commands.push(Command::ClearRect {
            x,
            y,
            width,
            height,
        });
    }

    pub fn draw_text(&mut self, x: Px, y: Px, text: impl Into<String>, max_width: Option<Px>) {
        self.commands.push(Command::DrawText {
            x,
            y,
            text: text.into(),
            max_width,
        });
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn finish(self) -> Document {
        Document {
            size: self.size,
            commands: self.commands,
        }
    }
}
