use resvg::tiny_skia;

use crate::foundation::error::{MockupError, MockupResult};

/// Compositing operator used to place the logo layer onto the template.
///
/// 27 wire names are accepted; `colour-dodge` and
/// `colour-burn` are spellings of [`BlendMode::ColorDodge`] and [`BlendMode::ColorBurn`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    /// Clears the destination under the layer.
    Clear,
    /// Replaces the destination with the layer.
    Source,
    /// Layer over destination (premultiplied source-over).
    #[default]
    Over,
    /// Layer where the destination is opaque.
    In,
    /// Layer where the destination is transparent.
    Out,
    /// Layer atop the destination.
    Atop,
    /// Keeps the destination.
    Dest,
    /// Destination over the layer.
    DestOver,
    /// Destination where the layer is opaque.
    DestIn,
    /// Destination where the layer is transparent.
    DestOut,
    /// Destination atop the layer.
    DestAtop,
    /// Exclusive or of layer and destination coverage.
    Xor,
    /// Channel sum.
    Add,
    /// Saturating add of coverage; no tiny-skia primitive exists for it.
    Saturate,
    /// Channel product.
    Multiply,
    /// Inverted product of inverses.
    Screen,
    /// Multiply or screen depending on the destination.
    Overlay,
    /// Per-channel minimum.
    Darken,
    /// Per-channel maximum.
    Lighten,
    /// Brightens the destination by the layer.
    #[serde(alias = "colour-dodge")]
    ColorDodge,
    /// Darkens the destination by the layer.
    #[serde(alias = "colour-burn")]
    ColorBurn,
    /// Multiply or screen depending on the layer.
    HardLight,
    /// Soft version of hard light.
    SoftLight,
    /// Absolute channel difference.
    Difference,
    /// Low-contrast difference.
    Exclusion,
}

impl BlendMode {
    /// Every operator, in declaration order.
    pub const ALL: [BlendMode; 25] = [
        Self::Clear,
        Self::Source,
        Self::Over,
        Self::In,
        Self::Out,
        Self::Atop,
        Self::Dest,
        Self::DestOver,
        Self::DestIn,
        Self::DestOut,
        Self::DestAtop,
        Self::Xor,
        Self::Add,
        Self::Saturate,
        Self::Multiply,
        Self::Screen,
        Self::Overlay,
        Self::Darken,
        Self::Lighten,
        Self::ColorDodge,
        Self::ColorBurn,
        Self::HardLight,
        Self::SoftLight,
        Self::Difference,
        Self::Exclusion,
    ];

    /// Canonical wire name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Source => "source",
            Self::Over => "over",
            Self::In => "in",
            Self::Out => "out",
            Self::Atop => "atop",
            Self::Dest => "dest",
            Self::DestOver => "dest-over",
            Self::DestIn => "dest-in",
            Self::DestOut => "dest-out",
            Self::DestAtop => "dest-atop",
            Self::Xor => "xor",
            Self::Add => "add",
            Self::Saturate => "saturate",
            Self::Multiply => "multiply",
            Self::Screen => "screen",
            Self::Overlay => "overlay",
            Self::Darken => "darken",
            Self::Lighten => "lighten",
            Self::ColorDodge => "color-dodge",
            Self::ColorBurn => "color-burn",
            Self::HardLight => "hard-light",
            Self::SoftLight => "soft-light",
            Self::Difference => "difference",
            Self::Exclusion => "exclusion",
        }
    }

    /// Parse a wire name, including the `colour-*` spellings.
    pub fn parse(name: &str) -> MockupResult<Self> {
        match name {
            "colour-dodge" => return Ok(Self::ColorDodge),
            "colour-burn" => return Ok(Self::ColorBurn),
            _ => {}
        }
        Self::ALL
            .into_iter()
            .find(|m| m.name() == name)
            .ok_or_else(|| MockupError::validation(format!("unknown blend mode \"{name}\"")))
    }

    /// The rasterizer primitive implementing this operator.
    ///
    /// Operators without a primitive fail here, before any pixel work starts.
    pub fn to_tiny_skia(self) -> MockupResult<tiny_skia::BlendMode> {
        use tiny_skia::BlendMode as Ts;

        Ok(match self {
            Self::Clear => Ts::Clear,
            Self::Source => Ts::Source,
            Self::Over => Ts::SourceOver,
            Self::In => Ts::SourceIn,
            Self::Out => Ts::SourceOut,
            Self::Atop => Ts::SourceAtop,
            Self::Dest => Ts::Destination,
            Self::DestOver => Ts::DestinationOver,
            Self::DestIn => Ts::DestinationIn,
            Self::DestOut => Ts::DestinationOut,
            Self::DestAtop => Ts::DestinationAtop,
            Self::Xor => Ts::Xor,
            Self::Add => Ts::Plus,
            Self::Multiply => Ts::Multiply,
            Self::Screen => Ts::Screen,
            Self::Overlay => Ts::Overlay,
            Self::Darken => Ts::Darken,
            Self::Lighten => Ts::Lighten,
            Self::ColorDodge => Ts::ColorDodge,
            Self::ColorBurn => Ts::ColorBurn,
            Self::HardLight => Ts::HardLight,
            Self::SoftLight => Ts::SoftLight,
            Self::Difference => Ts::Difference,
            Self::Exclusion => Ts::Exclusion,
            Self::Saturate => {
                return Err(MockupError::render(
                    "blend mode \"saturate\" has no compositing primitive",
                ));
            }
        })
    }
}

impl std::fmt::Display for BlendMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for BlendMode {
    type Err = MockupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/blend.rs"]
mod tests;
