//! Color command: parse CSS-style colors and print their other forms.

use anyhow::{Context, Result, bail};
use three_math::Color;
use tracing::warn;

use crate::ColorArgs;

/// Hex, style and HSL renderings of a parsed color.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorForms {
    /// `#rrggbb`
    pub hex: String,
    /// `rgb(RRR,GGG,BBB)`
    pub style: String,
    /// Hue in degrees, saturation and lightness in percent
    pub hsl: (f64, f64, f64),
}

/// Parses `style`.
pub fn describe(style: &str) -> Result<ColorForms> {
    let mut color = Color::default();
    color
        .try_set_style(style)
        .with_context(|| format!("Failed to parse color: {style}"))?;
    let (h, s, l) = color.get_hsl();
    Ok(ColorForms {
        hex: format!("#{}", color.get_hex_string()),
        style: color.get_style(),
        hsl: (h * 360.0, s * 100.0, l * 100.0),
    })
}

/// Runs the color command.
pub fn run(args: ColorArgs, verbose: bool) -> Result<()> {
    let mut parsed = 0;
    for style in &args.styles {
        let forms = match describe(style) {
            Ok(forms) => forms,
            Err(e) if !args.strict => {
                warn!(style = %style, "Skipping unparseable color");
                if verbose {
                    eprintln!("{e:#}");
                }
                continue;
            }
            Err(e) => return Err(e),
        };
        parsed += 1;
        let (h, s, l) = forms.hsl;
        println!(
            "{:<24} {}  {}  hsl({:.1}, {:.1}%, {:.1}%)",
            style, forms.hex, forms.style, h, s, l
        );
    }
    if parsed == 0 {
        bail!("No color could be parsed");
    }
    Ok(())
}
