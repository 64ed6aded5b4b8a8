use crate::coords::Vec2;
use crate::layers::LineStyle;

use super::vertex::{LineVertex, COORD_SCALE, DIR_SCALE};

// Slot order inside a 4-vertex quad block.
const EVEN_START: usize = 0;
const ODD_START: usize = 1;
const EVEN_END: usize = 2;
const ODD_END: usize = 3;

/// Quad counts per draw pass.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct QuadCounts {
    pub even: u32,
    pub odd: u32,
}

impl QuadCounts {
    #[inline]
    pub const fn total(self) -> u32 {
        self.even + self.odd
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.total() == 0
    }
}

/// Packs polylines of one layer into quad blocks.
///
/// Every segment becomes one quad. Segments alternate between the even and the
/// odd pass, so two segments sharing a joint are never drawn in the same pass.
/// A block of four vertex slots holds one even and one odd quad:
///
/// ```text
/// slot:    0            1           2          3
///        [even start, odd start, even end, odd end]
/// ```
///
/// The even pass reads slots 0/2 of every block, the odd pass slots 1/3, each
/// with a 48-byte quad stride. Parity continues across lines of the same
/// layer: a line that follows an even segment fills the free odd half of the
/// last block first.
#[derive(Debug, Clone)]
pub struct QuadGeometryBuilder {
    counts: QuadCounts,
    /// Index of the first slot of the block whose odd half is still free.
    open_block: Option<usize>,
    /// Arc lengths wrap at this value (packed units).
    length_wrap: f32,
}

impl QuadGeometryBuilder {
    /// Creates a builder for a layer drawn with `style`.
    ///
    /// The style only determines where packed arc lengths wrap.
    pub fn new(style: &LineStyle) -> Self {
        Self {
            counts: QuadCounts::default(),
            open_block: None,
            length_wrap: length_wrap(style.stipple),
        }
    }

    /// Quads written so far for this layer.
    #[inline]
    pub fn counts(&self) -> QuadCounts {
        self.counts
    }

    /// Appends one quad per segment of `points` to `out`.
    ///
    /// Fewer than two points produce nothing and leave `out` untouched.
    /// Returns the quads added by this call.
    pub fn add_line(&mut self, out: &mut Vec<LineVertex>, points: &[Vec2]) -> QuadCounts {
        let mut added = QuadCounts::default();
        if points.len() < 2 {
            return added;
        }

        let mut arc = 0.0f32;

        for seg in points.windows(2) {
            let (a, b) = (seg[0], seg[1]);
            let d = b - a;
            let seg_len = d.length();

            let dir = if seg_len > 0.0 {
                pack_normal(d.perp() / seg_len)
            } else {
                [0, 0]
            };

            let (len0, len1) = self.wrap_lengths(arc, seg_len * COORD_SCALE);
            arc += seg_len * COORD_SCALE;

            let start = LineVertex::new(pack_position(a), dir, len0);
            let end = LineVertex::new(pack_position(b), dir, len1);

            match self.open_block.take() {
                Some(block) => {
                    out[block + ODD_START] = start;
                    out[block + ODD_END] = end;
                    self.counts.odd += 1;
                    added.odd += 1;
                }
                None => {
                    let block = out.len();
                    out.resize(block + 4, LineVertex::default());
                    out[block + EVEN_START] = start;
                    out[block + EVEN_END] = end;
                    self.open_block = Some(block);
                    self.counts.even += 1;
                    added.even += 1;
                }
            }
        }

        added
    }

    /// Packed `(start, end)` lengths for a segment starting at arc length `arc`.
    fn wrap_lengths(&self, arc: f32, seg_len: f32) -> (i16, i16) {
        let max = i16::MAX as f32;
        let mut start = arc.rem_euclid(self.length_wrap);
        let mut end = start + seg_len;
        if end > max {
            start -= self.length_wrap;
            end -= self.length_wrap;
        }
        (clamp_i16(start), clamp_i16(end))
    }
}

/// Largest multiple of the stipple base period that fits in `i16`.
///
/// The shader divides lengths by `COORD_SCALE * stipple / k` for integer
/// `k >= 1`; wrapping at a multiple of the `k = 1` period keeps the phase
/// continuous for every `k`.
fn length_wrap(stipple: f32) -> f32 {
    let max = i16::MAX as f32;
    let period = 2.0 * COORD_SCALE * stipple;
    if period >= 1.0 && period <= max {
        (max / period).floor() * period
    } else {
        max
    }
}

#[inline]
fn clamp_i16(v: f32) -> i16 {
    v.round().clamp(i16::MIN as f32, i16::MAX as f32) as i16
}

#[inline]
fn pack_position(p: Vec2) -> [i16; 2] {
    [clamp_i16(p.x * COORD_SCALE), clamp_i16(p.y * COORD_SCALE)]
}

#[inline]
fn pack_normal(n: Vec2) -> [i16; 2] {
    [clamp_i16(n.x * DIR_SCALE), clamp_i16(n.y * DIR_SCALE)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Color;

    fn style(stipple: f32) -> LineStyle {
        LineStyle::new(Color::from_argb(0xFF_33_33_33), Color::from_argb(0xFF_FF_FF_FF), stipple, 0.6)
    }

    fn zigzag(n: usize) -> Vec<Vec2> {
        (0..n)
            .map(|i| Vec2::new(i as f32 * 4.0, if i % 2 == 0 { 0.0 } else { 3.0 }))
            .collect()
    }

    // ── degenerate input ──────────────────────────────────────────────────

    #[test]
    fn fewer_than_two_points_writes_nothing() {
        let mut out = vec![LineVertex::default()];
        let mut b = QuadGeometryBuilder::new(&style(4.0));

        assert!(b.add_line(&mut out, &[]).is_empty());
        assert!(b.add_line(&mut out, &[Vec2::new(1.0, 1.0)]).is_empty());
        assert_eq!(out.len(), 1);
        assert!(b.counts().is_empty());
    }

    // ── quad counts ───────────────────────────────────────────────────────

    #[test]
    fn n_points_make_n_minus_one_quads() {
        for n in 2..40 {
            let mut out = Vec::new();
            let mut b = QuadGeometryBuilder::new(&style(4.0));
            let c = b.add_line(&mut out, &zigzag(n));

            assert_eq!(c.total() as usize, n - 1, "n = {n}");
            assert!(c.even >= c.odd && c.even - c.odd <= 1, "n = {n}");
            assert_eq!(out.len(), 4 * c.even as usize);
        }
    }

    #[test]
    fn parity_continues_across_lines() {
        let mut out = Vec::new();
        let mut b = QuadGeometryBuilder::new(&style(4.0));

        // One even segment leaves the odd half of block 0 open.
        b.add_line(&mut out, &[Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)]);
        assert_eq!(out.len(), 4);

        // The next line starts in that odd half, then opens block 1.
        let added = b.add_line(
            &mut out,
            &[Vec2::new(0.0, 5.0), Vec2::new(0.0, 15.0), Vec2::new(0.0, 25.0)],
        );
        assert_eq!(added, QuadCounts { even: 1, odd: 1 });
        assert_eq!(b.counts(), QuadCounts { even: 2, odd: 1 });
        assert_eq!(out.len(), 8);

        assert_eq!(out[ODD_START].pos, [0, 40]);
        assert_eq!(out[ODD_END].pos, [0, 120]);
        assert_eq!(out[4 + EVEN_START].pos, [0, 120]);
        assert_eq!(out[4 + EVEN_END].pos, [0, 200]);
    }

    // ── packing ───────────────────────────────────────────────────────────

    #[test]
    fn horizontal_segment_packs_position_normal_and_length() {
        let mut out = Vec::new();
        let mut b = QuadGeometryBuilder::new(&style(4.0));
        b.add_line(&mut out, &[Vec2::new(1.0, 2.0), Vec2::new(11.0, 2.0)]);

        assert_eq!(out[EVEN_START], LineVertex::new([8, 16], [0, 2048], 0));
        assert_eq!(out[EVEN_END], LineVertex::new([88, 16], [0, 2048], 80));
        // Odd half stays zeroed until a following segment claims it.
        assert_eq!(out[ODD_START], LineVertex::default());
        assert_eq!(out[ODD_END], LineVertex::default());
    }

    #[test]
    fn arc_length_accumulates_along_line() {
        let mut out = Vec::new();
        let mut b = QuadGeometryBuilder::new(&style(4.0));
        b.add_line(
            &mut out,
            &[Vec2::new(0.0, 0.0), Vec2::new(3.0, 4.0), Vec2::new(3.0, 10.0)],
        );

        // Segment 0 (even): 0 -> 5 units; segment 1 (odd): 5 -> 11 units.
        assert_eq!(out[EVEN_START].len[0], 0);
        assert_eq!(out[EVEN_END].len[0], 40);
        assert_eq!(out[ODD_START].len[0], 40);
        assert_eq!(out[ODD_END].len[0], 88);
    }

    #[test]
    fn zero_length_segment_gets_zero_normal() {
        let mut out = Vec::new();
        let mut b = QuadGeometryBuilder::new(&style(4.0));
        let c = b.add_line(&mut out, &[Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0)]);

        assert_eq!(c.total(), 1);
        assert_eq!(out[EVEN_START].dir, [0, 0]);
        assert_eq!(out[EVEN_END].dir, [0, 0]);
    }

    #[test]
    fn long_lines_wrap_lengths_on_stipple_period() {
        let stipple = 10.0;
        let period = 2.0 * COORD_SCALE * stipple; // 160 packed units
        let points: Vec<Vec2> = (0..40).map(|i| Vec2::new(0.0, i as f32 * 250.0)).collect();

        let mut out = Vec::new();
        let mut b = QuadGeometryBuilder::new(&style(stipple));
        b.add_line(&mut out, &points);

        let seg = 250.0 * COORD_SCALE;
        for (i, block) in out.chunks(4).enumerate() {
            for (slot_start, slot_end, k) in [(EVEN_START, EVEN_END, 2 * i), (ODD_START, ODD_END, 2 * i + 1)] {
                if k >= points.len() - 1 {
                    continue;
                }
                let start = block[slot_start].len[0] as f32;
                let end = block[slot_end].len[0] as f32;
                let arc = k as f32 * seg;

                assert_eq!(end - start, seg, "segment {k}");
                assert_eq!(start.rem_euclid(period), arc.rem_euclid(period), "segment {k}");
            }
        }
    }

    #[test]
    fn length_wrap_without_stipple_is_i16_max() {
        assert_eq!(length_wrap(0.0), i16::MAX as f32);
        assert_eq!(length_wrap(10.0), 32_640.0);
    }
}
