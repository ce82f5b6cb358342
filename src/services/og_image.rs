// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Open Graph preview image (SVG) showing the current drip count.

/// Image width in pixels (Open Graph recommended size).
pub const WIDTH: u32 = 1200;
/// Image height in pixels.
pub const HEIGHT: u32 = 630;

/// Render the 1200x630 preview card for `count`.
pub fn render_svg(count: u64) -> String {
    format!(
        r##"<svg width="{WIDTH}" height="{HEIGHT}" xmlns="http://www.w3.org/2000/svg">
  <rect width="{WIDTH}" height="{HEIGHT}" fill="#f0f9ff" />
  <text x="600" y="200" font-size="120" text-anchor="middle" dominant-baseline="middle">💦</text>
  <text x="600" y="350" font-size="160" font-weight="bold" fill="#0ea5e9" text-anchor="middle" dominant-baseline="middle">{count}</text>
  <text x="600" y="450" font-size="80" font-weight="500" fill="#0ea5e9" text-anchor="middle" dominant-baseline="middle">お尻汗</text>
  <text x="600" y="520" font-size="40" fill="#334155" text-anchor="middle" dominant-baseline="middle">Counting the number of times sweat has</text>
  <text x="600" y="570" font-size="40" fill="#334155" text-anchor="middle" dominant-baseline="middle">dripped down the crack of a butt</text>
</svg>
"##
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_contains_count() {
        let svg = render_svg(1234);
        assert!(svg.starts_with("<svg width=\"1200\" height=\"630\""));
        assert!(svg.contains(">1234</text>"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }
}
