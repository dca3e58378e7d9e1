// Indexed palette storage, snapshot diffing and ramps.
use serde::{Deserialize, Serialize};

use crate::color::{ColorIdx, ColorRGB};

pub const DEFAULT_PALETTE_SIZE: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    colors: Vec<ColorRGB>,
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(DEFAULT_PALETTE_SIZE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffRange {
    pub from: ColorIdx,
    pub to: ColorIdx,
}

impl DiffRange {
    pub fn new(from: ColorIdx, to: ColorIdx) -> Self {
        Self { from, to }
    }

    pub fn union(&self, other: &DiffRange) -> DiffRange {
        DiffRange::new(self.from.min(other.from), self.to.max(other.to))
    }
}

impl Palette {
    pub fn new(size: usize) -> Self {
        Self {
            colors: vec![[0, 0, 0]; size],
        }
    }

    pub fn from_colors(colors: Vec<ColorRGB>) -> Self {
        Self { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[ColorRGB] {
        &self.colors
    }

    pub fn get(&self, idx: ColorIdx) -> Option<ColorRGB> {
        self.colors.get(idx).copied()
    }

    // Writes are ignored outside the palette; its size never changes.
    pub fn set(&mut self, idx: ColorIdx, color: ColorRGB) {
        if let Some(entry) = self.colors.get_mut(idx) {
            *entry = color;
        }
    }

    pub fn copy_colors_to(&self, dst: &mut Palette) {
        let n = self.len().min(dst.len());
        dst.colors[..n].copy_from_slice(&self.colors[..n]);
    }

    // Unchanged entries between the two ends still belong to the range.
    pub fn diff_range(&self, other: &Palette) -> Option<DiffRange> {
        let len = self.len().max(other.len());
        let differs = |i: usize| self.get(i) != other.get(i);
        let from = (0..len).find(|&i| differs(i))?;
        let to = (from..len).rev().find(|&i| differs(i))?;
        Some(DiffRange::new(from, to))
    }

    pub fn make_horz_ramp(&mut self, from: ColorIdx, to: ColorIdx) {
        let (from, to) = if from <= to { (from, to) } else { (to, from) };
        if to >= self.len() || to - from < 2 {
            return;
        }
        let c1 = self.colors[from];
        let c2 = self.colors[to];
        let n = (to - from) as i32;
        for i in from + 1..to {
            let t = (i - from) as i32;
            let mut c = [0; 3];
            for k in 0..3 {
                let a = c1[k] as i32;
                let b = c2[k] as i32;
                c[k] = (a + (b - a) * t / n) as u8;
            }
            self.colors[i] = c;
        }
    }
}
