//! Retained status surface drawn with `embedded-graphics`.
//!
//! Element state is kept between frames; [`GraphicsSurface::draw`] paints
//! the current state onto any monochrome draw target (the SSD1306 frame
//! buffer on the dongle, a `MockDisplay` in tests). The indicator
//! animation is advanced by the owner calling [`GraphicsSurface::tick`].

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use heapless::String;

use super::{Element, Glyph, IndicatorMotion, StatusSurface};
use crate::config::{
    BT_LABEL, GLYPH_SIZE, LABEL_CAPACITY, USB_ANCHOR, USB_LABEL, USB_LABEL_POS, USB_STATUS_POS,
    WIDGET_SIZE, WIRELESS_LABEL_POS, WIRELESS_STATUS_POS,
};
use crate::error::RenderError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct RunningMotion {
    from: Rectangle,
    to: Rectangle,
    duration_ms: u32,
    elapsed_ms: u32,
}

impl RunningMotion {
    fn current(&self) -> Rectangle {
        if self.elapsed_ms >= self.duration_ms {
            return self.to;
        }
        let lerp = |a: i32, b: i32| -> i32 {
            let delta = i64::from(b) - i64::from(a);
            a + (delta * i64::from(self.elapsed_ms) / i64::from(self.duration_ms)) as i32
        };
        let size = |a: u32, b: u32| -> u32 { lerp(a as i32, b as i32).max(0) as u32 };

        Rectangle::new(
            Point::new(
                lerp(self.from.top_left.x, self.to.top_left.x),
                lerp(self.from.top_left.y, self.to.top_left.y),
            ),
            Size::new(
                size(self.from.size.width, self.to.size.width),
                size(self.from.size.height, self.to.size.height),
            ),
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphicsSurface {
    /// Top-left of the widget on the display.
    origin: Point,
    released: bool,
    hidden: [bool; Element::COUNT],
    texts: [String<LABEL_CAPACITY>; Element::COUNT],
    glyphs: [Option<Glyph>; Element::COUNT],
    /// Indicator frame in widget-local coordinates.
    indicator: Rectangle,
    motion: Option<RunningMotion>,
    transitions_started: u32,
}

impl GraphicsSurface {
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Area the widget occupies on the display.
    pub fn bounding_box(&self) -> Rectangle {
        Rectangle::new(self.origin, WIDGET_SIZE)
    }

    pub fn is_hidden(&self, element: Element) -> bool {
        self.hidden[element.index()]
    }

    pub fn text(&self, element: Element) -> &str {
        self.texts[element.index()].as_str()
    }

    pub fn glyph(&self, element: Element) -> Option<Glyph> {
        self.glyphs[element.index()]
    }

    /// Current (possibly mid-animation) indicator frame, widget-local.
    pub fn indicator(&self) -> Rectangle {
        self.indicator
    }

    pub fn is_animating(&self) -> bool {
        self.motion.is_some()
    }

    /// Number of indicator animations started since creation.
    pub fn transitions_started(&self) -> u32 {
        self.transitions_started
    }

    /// Tear the surface down. Every later mutation fails.
    pub fn release(&mut self) {
        self.released = true;
        self.motion = None;
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Advance the indicator animation. Returns `true` while it still runs.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        let Some(motion) = self.motion.as_mut() else {
            return false;
        };
        motion.elapsed_ms = motion.elapsed_ms.saturating_add(elapsed_ms);
        self.indicator = motion.current();

        if motion.elapsed_ms >= motion.duration_ms {
            self.motion = None;
        }
        self.motion.is_some()
    }

    /// Paint every visible element. A released surface draws nothing.
    pub fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        if self.released {
            return Ok(());
        }

        for element in Element::ALL {
            if self.is_hidden(element) {
                continue;
            }
            match element {
                Element::UsbLabel => self.draw_text(target, element, USB_LABEL_POS)?,
                Element::WirelessLabel => self.draw_text(target, element, WIRELESS_LABEL_POS)?,
                Element::UsbStatus => self.draw_glyph(target, element, USB_STATUS_POS)?,
                Element::WirelessStatus => self.draw_glyph(target, element, WIRELESS_STATUS_POS)?,
                Element::Indicator => {
                    self.indicator
                        .translate(self.origin)
                        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
                        .draw(target)?;
                }
            }
        }
        Ok(())
    }

    fn draw_text<D>(&self, target: &mut D, element: Element, pos: Point) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        Text::with_baseline(self.text(element), self.origin + pos, text_style(), Baseline::Top)
            .draw(target)?;
        Ok(())
    }

    fn draw_glyph<D>(&self, target: &mut D, element: Element, pos: Point) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let Some(glyph) = self.glyph(element) else {
            return Ok(());
        };
        let top_left = self.origin + pos;
        let square = Rectangle::new(top_left, Size::new(GLYPH_SIZE, GLYPH_SIZE));
        let fill = PrimitiveStyle::with_fill(BinaryColor::On);
        let stroke = PrimitiveStyle::with_stroke(BinaryColor::On, 1);

        match glyph {
            Glyph::UsbReady => square.into_styled(fill).draw(target),
            Glyph::UsbNotReady => square.into_styled(stroke).draw(target),
            Glyph::ProfileConnected => Circle::new(top_left, GLYPH_SIZE).into_styled(fill).draw(target),
            Glyph::ProfileDisconnected => {
                Circle::new(top_left, GLYPH_SIZE).into_styled(stroke).draw(target)
            }
            Glyph::ProfileOpen => {
                // Dashed outline: the four corners only.
                let last = GLYPH_SIZE as i32 - 1;
                for corner in [
                    Point::new(0, 0),
                    Point::new(last, 0),
                    Point::new(0, last),
                    Point::new(last, last),
                ] {
                    Pixel(top_left + corner, BinaryColor::On).draw(target)?;
                }
                Ok(())
            }
        }
    }

    fn check_alive(&self) -> Result<(), RenderError> {
        if self.released {
            Err(RenderError::SurfaceGone)
        } else {
            Ok(())
        }
    }
}

impl StatusSurface for GraphicsSurface {
    type Parent = Point;

    /// Element tree as built before any status is known: both groups
    /// visible with placeholder content, indicator hidden.
    fn create(origin: Point) -> Self {
        let mut surface = Self {
            origin,
            released: false,
            hidden: [false; Element::COUNT],
            texts: core::array::from_fn(|_| String::new()),
            glyphs: [None; Element::COUNT],
            indicator: USB_ANCHOR,
            motion: None,
            transitions_started: 0,
        };
        surface.hidden[Element::Indicator.index()] = true;
        let _ = surface.texts[Element::UsbLabel.index()].push_str(USB_LABEL);
        let _ = surface.texts[Element::WirelessLabel.index()].push_str(BT_LABEL);
        let _ = surface.texts[Element::WirelessLabel.index()].push('1');
        surface
    }

    fn set_hidden(&mut self, element: Element, hidden: bool) -> Result<(), RenderError> {
        self.check_alive()?;
        self.hidden[element.index()] = hidden;
        Ok(())
    }

    fn set_text(&mut self, element: Element, text: &str) -> Result<(), RenderError> {
        self.check_alive()?;
        let slot = &mut self.texts[element.index()];
        slot.clear();
        // Truncate if too long.
        for c in text.chars() {
            if slot.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }

    fn set_glyph(&mut self, element: Element, glyph: Glyph) -> Result<(), RenderError> {
        self.check_alive()?;
        self.glyphs[element.index()] = Some(glyph);
        Ok(())
    }

    fn place_indicator(&mut self, area: Rectangle) -> Result<(), RenderError> {
        self.check_alive()?;
        self.motion = None;
        self.indicator = area;
        self.hidden[Element::Indicator.index()] = false;
        Ok(())
    }

    fn animate_indicator(&mut self, motion: IndicatorMotion) -> Result<(), RenderError> {
        self.check_alive()?;
        // Retargeting mid-flight continues from where the frame is now
        // instead of jumping back to the old anchor.
        let from = if self.motion.is_some() {
            self.indicator
        } else {
            motion.from
        };
        let running = RunningMotion {
            from,
            to: motion.to,
            duration_ms: motion.duration_ms,
            elapsed_ms: 0,
        };
        self.indicator = running.current();
        self.motion = (motion.duration_ms > 0).then_some(running);
        self.hidden[Element::Indicator.index()] = false;
        self.transitions_started += 1;
        Ok(())
    }
}

fn text_style() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(BinaryColor::On)
        .build()
}
