use crossterm::style::Color;

/// Colour scheme handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    pub primary: Color,
    pub secondary: Color,
    pub accent: Color,
    pub muted: Color,
    pub text: Color,
    pub warning: Color,
    pub success: Color,
    pub error: Color,
    pub selected_bg: Color,
}

const fn rgb(hex: u32) -> Color {
    Color::Rgb {
        r: ((hex >> 16) & 0xff) as u8,
        g: ((hex >> 8) & 0xff) as u8,
        b: (hex & 0xff) as u8,
    }
}

const THEMES: [(&str, Theme); 6] = [
    (
        "default",
        Theme {
            name: "Default",
            primary: rgb(0x7C3AED),
            secondary: rgb(0x06B6D4),
            accent: rgb(0x10B981),
            muted: rgb(0x6B7280),
            text: rgb(0xF3F4F6),
            warning: rgb(0xF59E0B),
            success: rgb(0x10B981),
            error: rgb(0xEF4444),
            selected_bg: rgb(0x374151),
        },
    ),
    (
        "catppuccin",
        Theme {
            name: "Catppuccin",
            primary: rgb(0xCBA6F7),
            secondary: rgb(0x89DCEB),
            accent: rgb(0xA6E3A1),
            muted: rgb(0x6C7086),
            text: rgb(0xCDD6F4),
            warning: rgb(0xF9E2AF),
            success: rgb(0xA6E3A1),
            error: rgb(0xF38BA8),
            selected_bg: rgb(0x45475A),
        },
    ),
    (
        "dracula",
        Theme {
            name: "Dracula",
            primary: rgb(0xBD93F9),
            secondary: rgb(0x8BE9FD),
            accent: rgb(0x50FA7B),
            muted: rgb(0x6272A4),
            text: rgb(0xF8F8F2),
            warning: rgb(0xFFB86C),
            success: rgb(0x50FA7B),
            error: rgb(0xFF5555),
            selected_bg: rgb(0x44475A),
        },
    ),
    (
        "nord",
        Theme {
            name: "Nord",
            primary: rgb(0x81A1C1),
            secondary: rgb(0x88C0D0),
            accent: rgb(0xA3BE8C),
            muted: rgb(0x4C566A),
            text: rgb(0xECEFF4),
            warning: rgb(0xEBCB8B),
            success: rgb(0xA3BE8C),
            error: rgb(0xBF616A),
            selected_bg: rgb(0x3B4252),
        },
    ),
    (
        "tokyonight",
        Theme {
            name: "Tokyo Night",
            primary: rgb(0xBB9AF7),
            secondary: rgb(0x7DCFFF),
            accent: rgb(0x9ECE6A),
            muted: rgb(0x565F89),
            text: rgb(0xC0CAF5),
            warning: rgb(0xE0AF68),
            success: rgb(0x9ECE6A),
            error: rgb(0xF7768E),
            selected_bg: rgb(0x292E42),
        },
    ),
    (
        "gruvbox",
        Theme {
            name: "Gruvbox",
            primary: rgb(0xD3869B),
            secondary: rgb(0x83A598),
            accent: rgb(0xB8BB26),
            muted: rgb(0x928374),
            text: rgb(0xEBDBB2),
            warning: rgb(0xFABD2F),
            success: rgb(0xB8BB26),
            error: rgb(0xFB4934),
            selected_bg: rgb(0x3C3836),
        },
    ),
];

impl Theme {
    /// Look up a built-in theme by its key, e.g. `"nord"`
    pub fn by_name(name: &str) -> Option<Theme> {
        let name = name.trim().to_ascii_lowercase();
        THEMES
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, theme)| *theme)
    }

    /// Keys of all built-in themes
    pub fn names() -> Vec<&'static str> {
        THEMES.iter().map(|(key, _)| *key).collect()
    }
}

impl Default for Theme {
    fn default() -> Self {
        THEMES[0].1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(Theme::by_name("nord").map(|t| t.name), Some("Nord"));
        assert_eq!(Theme::by_name(" Dracula ").map(|t| t.name), Some("Dracula"));
        assert!(Theme::by_name("solarized").is_none());
        assert_eq!(Theme::default().name, "Default");
    }

    #[test]
    fn test_names_resolve() {
        let names = Theme::names();
        assert_eq!(names.len(), 6);
        for name in names {
            assert!(Theme::by_name(name).is_some(), "{} should resolve", name);
        }
    }

    #[test]
    fn test_rgb() {
        assert_eq!(rgb(0x7C3AED), Color::Rgb { r: 0x7C, g: 0x3A, b: 0xED });
    }
}
