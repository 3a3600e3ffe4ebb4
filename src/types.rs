//! Core types for spark-widgets.
//!
//! Element kinds, named terminal colors, attribute flags and the attribute
//! sets widgets switch between as their state changes.

// =============================================================================
// Color
// =============================================================================

/// Named terminal palette color.
///
/// Widgets only choose between palette entries; turning them into escape
/// sequences is the renderer's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

impl Color {
    /// Parse a palette name (`"brightBlack"`, `"bright-black"`, `"gray"`...).
    pub fn parse(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| *c != '-' && *c != '_' && *c != ' ')
            .flat_map(char::to_lowercase)
            .collect();

        let color = match normalized.as_str() {
            "black" => Self::Black,
            "red" => Self::Red,
            "green" => Self::Green,
            "yellow" => Self::Yellow,
            "blue" => Self::Blue,
            "magenta" => Self::Magenta,
            "cyan" => Self::Cyan,
            "white" => Self::White,
            "brightblack" | "gray" | "grey" => Self::BrightBlack,
            "brightred" => Self::BrightRed,
            "brightgreen" => Self::BrightGreen,
            "brightyellow" => Self::BrightYellow,
            "brightblue" => Self::BrightBlue,
            "brightmagenta" => Self::BrightMagenta,
            "brightcyan" => Self::BrightCyan,
            "brightwhite" => Self::BrightWhite,
            _ => return None,
        };
        Some(color)
    }
}

impl From<Color> for crossterm::style::Color {
    fn from(color: Color) -> Self {
        use crossterm::style::Color as C;
        match color {
            Color::Black => C::Black,
            Color::Red => C::DarkRed,
            Color::Green => C::DarkGreen,
            Color::Yellow => C::DarkYellow,
            Color::Blue => C::DarkBlue,
            Color::Magenta => C::DarkMagenta,
            Color::Cyan => C::DarkCyan,
            Color::White => C::Grey,
            Color::BrightBlack => C::DarkGrey,
            Color::BrightRed => C::Red,
            Color::BrightGreen => C::Green,
            Color::BrightYellow => C::Yellow,
            Color::BrightBlue => C::Blue,
            Color::BrightMagenta => C::Magenta,
            Color::BrightCyan => C::Cyan,
            Color::BrightWhite => C::White,
        }
    }
}

// =============================================================================
// Cell Attributes (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Text attributes as a bitfield for efficient storage and comparison.
    ///
    /// Combine with bitwise OR: `Attr::BOLD | Attr::ITALIC`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        const NONE = 0;
        const BOLD = 1 << 0;
        const DIM = 1 << 1;
        const ITALIC = 1 << 2;
        const UNDERLINE = 1 << 3;
        const BLINK = 1 << 4;
        const INVERSE = 1 << 5;
        const HIDDEN = 1 << 6;
        const STRIKETHROUGH = 1 << 7;
    }
}

// =============================================================================
// Attribute Set
// =============================================================================

/// Colors plus flags applied to a run of text.
///
/// `None` colors inherit from whatever is underneath.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct AttrSet {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub flags: Attr,
}

impl AttrSet {
    pub const fn new() -> Self {
        Self { fg: None, bg: None, flags: Attr::NONE }
    }

    pub const fn fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    pub const fn bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    pub const fn flags(mut self, flags: Attr) -> Self {
        self.flags = flags;
        self
    }

    pub const fn bold(self) -> Self {
        self.flags(Attr::BOLD)
    }

    pub const fn dim(self) -> Self {
        self.flags(Attr::DIM)
    }
}

// =============================================================================
// Element Kinds - For parallel arrays
// =============================================================================

/// Element kinds for the parallel arrays pattern.
///
/// Each element at index i has kind[i] set to one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ElementKind {
    #[default]
    None = 0,
    Document = 1,
    Text = 2,
    Button = 3,
    EditableTextBox = 4,
    Menu = 5,
    TextInput = 6,
}

// =============================================================================
// Rect
// =============================================================================

/// Output rectangle of an element, in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    /// Check if a point is inside this rect.
    #[inline]
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x
            && x < self.x.saturating_add(self.width)
            && y >= self.y
            && y < self.y.saturating_add(self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_parse_accepts_terminal_kit_names() {
        assert_eq!(Color::parse("brightBlack"), Some(Color::BrightBlack));
        assert_eq!(Color::parse("bright-white"), Some(Color::BrightWhite));
        assert_eq!(Color::parse("grey"), Some(Color::BrightBlack));
        assert_eq!(Color::parse("blue"), Some(Color::Blue));
        assert_eq!(Color::parse("mauve"), None);
    }

    #[test]
    fn test_attr_set_builders() {
        let attr = AttrSet::new().bg(Color::White).fg(Color::Black).bold();
        assert_eq!(attr.bg, Some(Color::White));
        assert_eq!(attr.fg, Some(Color::Black));
        assert!(attr.flags.contains(Attr::BOLD));
        assert_eq!(AttrSet::default(), AttrSet::new());
    }

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(2, 3, 4, 1);
        assert!(rect.contains(2, 3));
        assert!(rect.contains(5, 3));
        assert!(!rect.contains(6, 3));
        assert!(!rect.contains(2, 4));
        assert!(!Rect::default().contains(0, 0));
    }
}
