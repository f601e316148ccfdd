//! Software rendering of game screens.
//!
//! [`Canvas`] is an RGBA frame buffer with a handful of drawing primitives. Like the primitives,
//! the text, line and marker builders returned by the drawing methods draw when they are dropped,
//! so they can be customized in a single expression:
//!
//! ```
//! # use shifumi::draw::{Canvas, Color};
//! let mut canvas = Canvas::new(640, 480);
//! canvas.text(320, 240, "3").color(Color::RED);
//! ```

use std::{convert::Infallible, fmt, path::Path};

use embedded_graphics::{
    draw_target::DrawTarget,
    mono_font::{
        ascii::{FONT_10X20, FONT_6X10},
        MonoFont, MonoTextStyle,
    },
    pixelcolor::raw::RawU32,
    prelude::*,
    primitives::{Line, PrimitiveStyle, Rectangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};
use image::{Rgba, RgbaImage};

use crate::{
    hand::{HandLandmarks, CONNECTIVITY},
    layout::{Align, TextLine, TextSize},
};

/// An 8-bit sRGB color with alpha channel.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Color(pub(crate) [u8; 4]);

impl Color {
    pub const BLACK: Self = Self([0, 0, 0, 255]);
    pub const WHITE: Self = Self([255, 255, 255, 255]);
    pub const GRAY: Self = Self([200, 200, 200, 255]);
    pub const RED: Self = Self([255, 0, 0, 255]);
    pub const GREEN: Self = Self([0, 255, 0, 255]);
    pub const BLUE: Self = Self([0, 0, 255, 255]);
    pub const YELLOW: Self = Self([255, 255, 0, 255]);
    pub const CYAN: Self = Self([0, 255, 255, 255]);
    pub const ORANGE: Self = Self([255, 165, 0, 255]);

    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }

    #[inline]
    pub fn r(&self) -> u8 {
        self.0[0]
    }

    #[inline]
    pub fn g(&self) -> u8 {
        self.0[1]
    }

    #[inline]
    pub fn b(&self) -> u8 {
        self.0[2]
    }

    #[inline]
    pub fn a(&self) -> u8 {
        self.0[3]
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}{:02x}",
            self.r(),
            self.g(),
            self.b(),
            self.a(),
        )
    }
}

impl PixelColor for Color {
    type Raw = RawU32;
}

/// An RGBA frame buffer to draw game screens on.
#[derive(Clone)]
pub struct Canvas {
    buf: RgbaImage,
}

impl Canvas {
    /// Creates a black canvas of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        let mut canvas = Self {
            buf: RgbaImage::new(width, height),
        };
        canvas.clear(Color::BLACK);
        canvas
    }

    /// Wraps an existing image, for example a camera frame, to draw on top of it.
    pub fn from_image(image: RgbaImage) -> Self {
        Self { buf: image }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.buf.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.buf.height()
    }

    /// Returns the color of the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    pub fn get(&self, x: u32, y: u32) -> Color {
        Color(self.buf.get_pixel(x, y).0)
    }

    /// Sets the pixel at `(x, y)` to `color`. Out-of-bounds coordinates are ignored.
    pub fn set(&mut self, x: i32, y: i32, color: Color) {
        if x >= 0 && (x as u32) < self.width() && y >= 0 && (y as u32) < self.height() {
            self.buf.put_pixel(x as u32, y as u32, Rgba(color.0));
        }
    }

    pub fn clear(&mut self, color: Color) {
        for pixel in self.buf.pixels_mut() {
            *pixel = Rgba(color.0);
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.buf
    }

    pub fn into_image(self) -> RgbaImage {
        self.buf
    }

    /// Saves the canvas to a file. The format is derived from the file extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        self.buf.save(path.as_ref())?;
        Ok(())
    }

    /// Draws a text string.
    ///
    /// By default, the text is centered horizontally around `x`, `y` is its baseline, and it is
    /// drawn white with a black outline.
    pub fn text<'a>(&'a mut self, x: i32, y: i32, text: &'a str) -> DrawText<'a> {
        DrawText {
            canvas: self,
            x,
            y,
            text,
            color: Color::WHITE,
            outline: Some(Color::BLACK),
            size: TextSize::Normal,
            align: Align::Center,
        }
    }

    /// Draws a line from `start` to `end`.
    pub fn line(&mut self, start: [i32; 2], end: [i32; 2]) -> DrawLine<'_> {
        DrawLine {
            canvas: self,
            start,
            end,
            color: Color::BLUE,
            stroke_width: 1,
        }
    }

    /// Draws an X-shaped marker centered on `(x, y)`.
    ///
    /// This can be used to visualize landmarks or points of interest.
    pub fn marker(&mut self, x: i32, y: i32) -> DrawMarker<'_> {
        DrawMarker {
            canvas: self,
            x,
            y,
            color: Color::RED,
            size: 5,
        }
    }

    /// Draws a list of laid-out text lines (see [`crate::layout::layout`]).
    pub fn draw_lines(&mut self, lines: &[TextLine]) {
        for line in lines {
            self.text(line.x, line.y, &line.text)
                .color(line.color)
                .size(line.size)
                .align(line.align);
        }
    }

    /// Draws the skeleton of a tracked hand.
    ///
    /// The hand's landmarks are expected in normalized coordinates and are scaled to the canvas.
    pub fn draw_hand(&mut self, hand: &HandLandmarks) {
        let (w, h) = (self.width() as f32, self.height() as f32);
        let to_px = |lm: crate::landmark::Landmark| [(lm.x() * w) as i32, (lm.y() * h) as i32];

        for (a, b) in CONNECTIVITY {
            let a = to_px(hand.get(*a));
            let b = to_px(hand.get(*b));
            self.line(a, b).color(Color::GREEN).stroke_width(2);
        }
        for lm in hand.landmarks().iter() {
            let [x, y] = to_px(lm);
            self.marker(x, y);
        }
    }
}

/// Guard returned by [`Canvas::text`]; draws the text when dropped and allows customization.
pub struct DrawText<'a> {
    canvas: &'a mut Canvas,
    x: i32,
    y: i32,
    text: &'a str,
    color: Color,
    outline: Option<Color>,
    size: TextSize,
    align: Align,
}

impl DrawText<'_> {
    /// Sets the text color.
    pub fn color(&mut self, color: Color) -> &mut Self {
        self.color = color;
        self
    }

    /// Sets the color of the 1-pixel outline drawn around each glyph, or disables it.
    pub fn outline(&mut self, outline: Option<Color>) -> &mut Self {
        self.outline = outline;
        self
    }

    pub fn size(&mut self, size: TextSize) -> &mut Self {
        self.size = size;
        self
    }

    /// Sets where the text is placed relative to the `x` coordinate.
    pub fn align(&mut self, align: Align) -> &mut Self {
        self.align = align;
        self
    }
}

impl Drop for DrawText<'_> {
    fn drop(&mut self) {
        let (font, scale) = font(self.size);
        let alignment = match self.align {
            Align::Left => Alignment::Left,
            Align::Center => Alignment::Center,
            Align::Right => Alignment::Right,
        };
        let text_style = TextStyleBuilder::new()
            .alignment(alignment)
            .baseline(Baseline::Alphabetic)
            .build();

        let scale = scale as i32;
        let origin = Point::new(self.x / scale, self.y / scale);
        let mut target = Target {
            canvas: &mut *self.canvas,
            scale,
        };

        if let Some(outline) = self.outline {
            let style = MonoTextStyle::new(font, outline);
            for (dx, dy) in [(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (-1, 1), (0, 1), (1, 1)] {
                let pos = origin + Point::new(dx, dy);
                match Text::with_text_style(self.text, pos, style, text_style).draw(&mut target) {
                    Ok(_) => {}
                    Err(infallible) => match infallible {},
                }
            }
        }

        let style = MonoTextStyle::new(font, self.color);
        match Text::with_text_style(self.text, origin, style, text_style).draw(&mut target) {
            Ok(_) => {}
            Err(infallible) => match infallible {},
        }
    }
}

/// Returns the font and integer upscaling factor to draw text of the given size with.
fn font(size: TextSize) -> (&'static MonoFont<'static>, u32) {
    match size {
        TextSize::Small => (&FONT_6X10, 1),
        TextSize::Normal => (&FONT_10X20, 1),
        TextSize::Large => (&FONT_10X20, 2),
        TextSize::Huge => (&FONT_10X20, 4),
    }
}

/// Guard returned by [`Canvas::line`]; draws the line when dropped and allows customization.
pub struct DrawLine<'a> {
    canvas: &'a mut Canvas,
    start: [i32; 2],
    end: [i32; 2],
    color: Color,
    stroke_width: u32,
}

impl DrawLine<'_> {
    /// Sets the line's color.
    pub fn color(&mut self, color: Color) -> &mut Self {
        self.color = color;
        self
    }

    /// Sets the line's stroke width.
    ///
    /// By default, a stroke width of 1 is used.
    pub fn stroke_width(&mut self, width: u32) -> &mut Self {
        self.stroke_width = width;
        self
    }
}

impl Drop for DrawLine<'_> {
    fn drop(&mut self) {
        let [x0, y0] = self.start;
        let [x1, y1] = self.end;
        match Line::new(Point::new(x0, y0), Point::new(x1, y1))
            .into_styled(PrimitiveStyle::with_stroke(self.color, self.stroke_width))
            .draw(&mut Target {
                canvas: &mut *self.canvas,
                scale: 1,
            }) {
            Ok(_) => {}
            Err(infallible) => match infallible {},
        }
    }
}

/// Guard returned by [`Canvas::marker`]; draws the marker when dropped and allows customization.
pub struct DrawMarker<'a> {
    canvas: &'a mut Canvas,
    x: i32,
    y: i32,
    color: Color,
    size: u32,
}

impl DrawMarker<'_> {
    /// Sets the marker's color.
    pub fn color(&mut self, color: Color) -> &mut Self {
        self.color = color;
        self
    }

    /// Sets the width and height of the marker.
    ///
    /// The default size is 5. The size must be *uneven* and *non-zero*. A size of 1 will result in
    /// a single pixel getting drawn.
    pub fn size(&mut self, size: u32) -> &mut Self {
        assert!(size != 0, "marker size must be greater than zero");
        assert!(size % 2 == 1, "marker size must be an uneven number");
        self.size = size;
        self
    }
}

impl Drop for DrawMarker<'_> {
    fn drop(&mut self) {
        let offset = ((self.size - 1) / 2) as i32;
        for (xoff, yoff) in (-offset..=offset)
            .zip(-offset..=offset)
            .chain((-offset..=offset).rev().zip(-offset..=offset))
        {
            self.canvas.set(self.x + xoff, self.y + yoff, self.color);
        }
    }
}

/// [`DrawTarget`] adapter that draws every pixel as a `scale`x`scale` block.
struct Target<'a> {
    canvas: &'a mut Canvas,
    scale: i32,
}

impl Dimensions for Target<'_> {
    fn bounding_box(&self) -> Rectangle {
        let scale = self.scale as u32;
        Rectangle {
            top_left: Point { x: 0, y: 0 },
            size: Size {
                width: self.canvas.width() / scale,
                height: self.canvas.height() / scale,
            },
        }
    }
}

impl DrawTarget for Target<'_> {
    type Color = Color;

    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = embedded_graphics::Pixel<Self::Color>>,
    {
        for Pixel(pos, color) in pixels {
            for dy in 0..self.scale {
                for dx in 0..self.scale {
                    self.canvas
                        .set(pos.x * self.scale + dx, pos.y * self.scale + dy, color);
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::hand::pose::HandPose;

    use super::*;

    fn count(canvas: &Canvas, color: Color) -> usize {
        canvas
            .image()
            .pixels()
            .filter(|p| p.0 == color.0)
            .count()
    }

    #[test]
    fn new_canvas_is_black() {
        let canvas = Canvas::new(4, 3);
        assert_eq!(count(&canvas, Color::BLACK), 12);
        assert_eq!(canvas.get(3, 2), Color::BLACK);
    }

    #[test]
    fn set_ignores_out_of_bounds() {
        let mut canvas = Canvas::new(2, 2);
        canvas.set(-1, 0, Color::RED);
        canvas.set(0, 2, Color::RED);
        canvas.set(1, 1, Color::RED);
        assert_eq!(count(&canvas, Color::RED), 1);
    }

    #[test]
    fn text_has_outline() {
        let mut canvas = Canvas::new(100, 40);
        canvas.clear(Color::BLUE);
        canvas.text(50, 30, "Hi").color(Color::GREEN);
        assert!(count(&canvas, Color::GREEN) > 0);
        assert!(count(&canvas, Color::BLACK) > 0);

        let mut plain = Canvas::new(100, 40);
        plain.clear(Color::BLUE);
        plain.text(50, 30, "Hi").color(Color::GREEN).outline(None);
        assert_eq!(count(&plain, Color::BLACK), 0);
        assert_eq!(count(&plain, Color::GREEN), count(&canvas, Color::GREEN));
    }

    #[test]
    fn scaled_text_covers_more_pixels() {
        let mut normal = Canvas::new(200, 100);
        normal.text(100, 80, "3").color(Color::RED).outline(None);
        let mut huge = Canvas::new(200, 100);
        huge.text(100, 80, "3")
            .color(Color::RED)
            .outline(None)
            .size(TextSize::Huge);

        assert_eq!(count(&huge, Color::RED), count(&normal, Color::RED) * 16);
    }

    #[test]
    fn marker() {
        let mut canvas = Canvas::new(5, 5);
        canvas.marker(2, 2).color(Color::WHITE).size(3);
        assert_eq!(count(&canvas, Color::WHITE), 5);
        assert_eq!(canvas.get(1, 1), Color::WHITE);
        assert_eq!(canvas.get(3, 1), Color::WHITE);
        assert_eq!(canvas.get(2, 1), Color::BLACK);
    }

    #[test]
    fn hand_overlay() {
        let mut canvas = Canvas::new(64, 48);
        canvas.draw_hand(&HandPose::paper().landmarks());
        assert!(count(&canvas, Color::GREEN) > 0);
        assert!(count(&canvas, Color::RED) > 0);
    }
}
