//! Display colors and the control-code selector table.

/// Colors a literal run can be painted with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// Plain black text, emitted without a wrapper
    #[default]
    Default,
    Blue,
    Grey,
    Navy,
    Green,
    LightBlue,
    Gold,
    Red,
    LightGreen,
    Purple,
    Pink,
}

/// Colors defined in the document preamble, in output order.
///
/// `Orange` has no selector but stays defined so hand edits of the
/// generated file can use it.
pub const PALETTE: &[(&str, (u8, u8, u8))] = &[
    ("Grey", (80, 80, 80)),
    ("Navy", (0, 0, 128)),
    ("Blue", (0, 0, 255)),
    ("Green", (0, 128, 0)),
    ("LGreen", (0, 128, 64)),
    ("LBlue", (128, 128, 255)),
    ("Purple", (128, 0, 128)),
    ("Pink", (255, 0, 255)),
    ("Red", (255, 0, 0)),
    ("Orange", (255, 128, 0)),
    ("Gold", (128, 128, 0)),
];

impl Color {
    /// Name used in `\textcolor{}`, `None` for [`Color::Default`]
    pub fn latex_name(self) -> Option<&'static str> {
        match self {
            Color::Default => None,
            Color::Blue => Some("Blue"),
            Color::Grey => Some("Grey"),
            Color::Navy => Some("Navy"),
            Color::Green => Some("Green"),
            Color::LightBlue => Some("LBlue"),
            Color::Gold => Some("Gold"),
            Color::Red => Some("Red"),
            Color::LightGreen => Some("LGreen"),
            Color::Purple => Some("Purple"),
            Color::Pink => Some("Pink"),
        }
    }

    /// Opening directive, empty for [`Color::Default`]
    pub fn prefix(self) -> String {
        match self.latex_name() {
            Some(name) => format!("\\textcolor{{{}}}{{", name),
            None => String::new(),
        }
    }

    /// Closing brace matching [`Color::prefix`]
    pub fn suffix(self) -> &'static str {
        if self.is_default() { "" } else { "}" }
    }

    pub fn is_default(self) -> bool {
        self == Color::Default
    }
}

/// Meaning of the byte that follows a frame marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    /// Paint the following run
    Paint(Color),
    /// Inline address tag; its digits follow and are discarded
    AddressTag,
    /// Recognized but produces nothing
    Ignore,
}

/// Inline address tag selector
pub const ADDRESS_TAG: u8 = 0x28;

/// Highest control-code value; everything above is literal text
pub const MAX_CONTROL: u8 = 0x2A;

/// Look up the selector for a control byte.
///
/// Returns `None` for NUL and for anything above [`MAX_CONTROL`].
pub fn selector(code: u8) -> Option<Selector> {
    let color = match code {
        0x01 | 0x0D | 0x13 => Color::Default,
        0x02 | 0x07 | 0x08 | 0x14 | 0x15 | 0x16 | 0x1A | 0x1B | 0x1D | 0x21 => Color::Blue,
        0x24..=0x27 => Color::Blue,
        0x03 | 0x04 | 0x17 => Color::Grey,
        0x05 | 0x06 | 0x09 | 0x20 => Color::Navy,
        0x0A | 0x0B | 0x0C | 0x0E | 0x19 | 0x1E => Color::Green,
        0x0F | 0x18 => Color::LightBlue,
        0x10 | 0x11 | 0x23 => Color::Gold,
        0x12 => Color::Red,
        0x1C => Color::Purple,
        0x1F => Color::LightGreen,
        0x22 => Color::Pink,
        ADDRESS_TAG => return Some(Selector::AddressTag),
        0x29 | MAX_CONTROL => return Some(Selector::Ignore),
        _ => return None,
    };
    Some(Selector::Paint(color))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_control_code_has_a_selector() {
        for code in 0x01..=MAX_CONTROL {
            assert!(selector(code).is_some(), "code {:#04x} has no entry", code);
        }
        assert_eq!(selector(0x00), None);
        assert_eq!(selector(0x2B), None);
        assert_eq!(selector(b'a'), None);
    }

    #[test]
    fn black_selectors_map_to_default() {
        for code in [0x01, 0x0D, 0x13] {
            assert_eq!(selector(code), Some(Selector::Paint(Color::Default)));
        }
    }

    #[test]
    fn spot_check_table() {
        assert_eq!(selector(0x05), Some(Selector::Paint(Color::Navy)));
        assert_eq!(selector(0x12), Some(Selector::Paint(Color::Red)));
        assert_eq!(selector(0x1C), Some(Selector::Paint(Color::Purple)));
        assert_eq!(selector(0x1F), Some(Selector::Paint(Color::LightGreen)));
        assert_eq!(selector(0x22), Some(Selector::Paint(Color::Pink)));
        assert_eq!(selector(0x28), Some(Selector::AddressTag));
        assert_eq!(selector(0x29), Some(Selector::Ignore));
    }

    #[test]
    fn default_has_no_wrapper() {
        assert_eq!(Color::Default.prefix(), "");
        assert_eq!(Color::Default.suffix(), "");
        assert_eq!(Color::LightBlue.prefix(), "\\textcolor{LBlue}{");
        assert_eq!(Color::LightBlue.suffix(), "}");
    }

    #[test]
    fn every_named_color_is_in_the_palette() {
        let colors = [
            Color::Blue,
            Color::Grey,
            Color::Navy,
            Color::Green,
            Color::LightBlue,
            Color::Gold,
            Color::Red,
            Color::LightGreen,
            Color::Purple,
            Color::Pink,
        ];
        for color in colors {
            let name = color.latex_name().unwrap();
            assert!(PALETTE.iter().any(|(n, _)| *n == name), "{} undefined", name);
        }
    }
}
