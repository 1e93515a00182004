/// Translation of crossterm events into viewer input and app commands
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use stereoview_core::{Direction, InputEvent};

/// Logical pointer pixels per terminal column / row
pub const CELL_WIDTH_PX: f64 = 8.0;
pub const CELL_HEIGHT_PX: f64 = 16.0;

/// Eye-distance multiplier for one `[` / `]` press
pub const EYE_DISTANCE_STEP: f64 = 0.9;
/// Focus change for one `,` / `.` press
pub const FOCUS_STEP: f64 = 0.5;

/// Terminal-side actions the viewer itself does not handle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    ScaleEyeDistance(f64),
    ShiftFocus(f64),
    Export,
    Resize(u16, u16),
}

/// A crossterm event routed either to the viewer or to the app
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TerminalInput {
    Viewer(InputEvent),
    App(Command),
}

pub fn translate(event: &Event) -> Option<TerminalInput> {
    match event {
        Event::Key(key) => translate_key(key),
        Event::Mouse(mouse) => translate_mouse(mouse).map(TerminalInput::Viewer),
        Event::Resize(width, height) => Some(TerminalInput::App(Command::Resize(*width, *height))),
        _ => None,
    }
}

fn translate_key(key: &KeyEvent) -> Option<TerminalInput> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let viewer = |event| Some(TerminalInput::Viewer(event));
    let command = match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return viewer(InputEvent::Close),
        KeyCode::Up => return viewer(InputEvent::Key(Direction::Up)),
        KeyCode::Down => return viewer(InputEvent::Key(Direction::Down)),
        KeyCode::Left => return viewer(InputEvent::Key(Direction::Left)),
        KeyCode::Right => return viewer(InputEvent::Key(Direction::Right)),
        KeyCode::Char('[') => Command::ScaleEyeDistance(EYE_DISTANCE_STEP),
        KeyCode::Char(']') => Command::ScaleEyeDistance(1.0 / EYE_DISTANCE_STEP),
        KeyCode::Char(',') => Command::ShiftFocus(-FOCUS_STEP),
        KeyCode::Char('.') => Command::ShiftFocus(FOCUS_STEP),
        KeyCode::Char('p') => Command::Export,
        _ => return None,
    };
    Some(TerminalInput::App(command))
}

fn translate_mouse(mouse: &MouseEvent) -> Option<InputEvent> {
    let x = mouse.column as f64 * CELL_WIDTH_PX;
    let y = mouse.row as f64 * CELL_HEIGHT_PX;
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(InputEvent::ButtonDown { x, y }),
        MouseEventKind::Up(MouseButton::Left) => Some(InputEvent::ButtonUp { x, y }),
        MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
            Some(InputEvent::PointerMoved { x, y })
        }
        MouseEventKind::ScrollUp => Some(InputEvent::Scroll { delta: 1.0 }),
        MouseEventKind::ScrollDown => Some(InputEvent::Scroll { delta: -1.0 }),
        _ => None,
    }
}
