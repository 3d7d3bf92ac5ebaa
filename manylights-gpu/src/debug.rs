#[cfg(not(target_arch = "spirv"))]
use core::fmt;

use glam::{uvec2, vec3, UVec2, Vec3};

use crate::atomic_add;

/// Which stage of the pipeline prints debug information for the selected
/// pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DebugMode {
    #[default]
    Disabled,

    /// Light sample generation: picked lights and their weights.
    Sampling,

    /// Visibility tracing: traced rays and their outcome.
    Tracing,
}

impl DebugMode {
    pub fn new(id: u32) -> Self {
        match id {
            1 => Self::Sampling,
            2 => Self::Tracing,
            _ => Self::Disabled,
        }
    }

    pub fn get(self) -> u32 {
        match self {
            Self::Disabled => 0,
            Self::Sampling => 1,
            Self::Tracing => 2,
        }
    }
}

/// Single piece of debug information produced by a kernel: a line of text
/// and a line segment in world space.
#[derive(Clone, Copy, Default, PartialEq)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct DebugRecord {
    pub kind: u32,
    pub screen_pos: UVec2,
    pub nth: u32,
    pub light_id: u32,
    pub is_visible: bool,
    pub weight: f32,
    pub distance: f32,
    pub max_distance: f32,
    pub from: Vec3,
    pub to: Vec3,
    pub color: Vec3,
}

impl DebugRecord {
    pub const KIND_SAMPLE: u32 = 1;
    pub const KIND_RAY: u32 = 2;

    /// Number of `u32`s occupied by a single record.
    pub const SIZE: usize = 18;

    pub fn sample(
        screen_pos: UVec2,
        nth: u32,
        light_id: u32,
        weight: f32,
        from: Vec3,
        to: Vec3,
        color: Vec3,
    ) -> Self {
        Self {
            kind: Self::KIND_SAMPLE,
            screen_pos,
            nth,
            light_id,
            weight,
            from,
            to,
            color,
            ..Default::default()
        }
    }

    pub fn ray(
        screen_pos: UVec2,
        nth: u32,
        light_id: u32,
        is_visible: bool,
        distance: f32,
        max_distance: f32,
        from: Vec3,
        to: Vec3,
    ) -> Self {
        Self {
            kind: Self::KIND_RAY,
            screen_pos,
            nth,
            light_id,
            is_visible,
            distance,
            max_distance,
            from,
            to,
            color: if is_visible { Vec3::Y } else { Vec3::X },
            ..Default::default()
        }
    }

    pub fn read(words: &[u32], ptr: usize) -> Self {
        let f = |offset: usize| f32::from_bits(words[ptr + offset]);

        Self {
            kind: words[ptr],
            screen_pos: uvec2(words[ptr + 1], words[ptr + 2]),
            nth: words[ptr + 3],
            light_id: words[ptr + 4],
            is_visible: words[ptr + 5] == 1,
            weight: f(6),
            distance: f(7),
            max_distance: f(8),
            from: vec3(f(9), f(10), f(11)),
            to: vec3(f(12), f(13), f(14)),
            color: vec3(f(15), f(16), f(17)),
        }
    }

    pub fn write(&self, words: &mut [u32], ptr: usize) {
        words[ptr] = self.kind;
        words[ptr + 1] = self.screen_pos.x;
        words[ptr + 2] = self.screen_pos.y;
        words[ptr + 3] = self.nth;
        words[ptr + 4] = self.light_id;
        words[ptr + 5] = self.is_visible as u32;
        words[ptr + 6] = self.weight.to_bits();
        words[ptr + 7] = self.distance.to_bits();
        words[ptr + 8] = self.max_distance.to_bits();

        let mut idx = 0;

        while idx < 3 {
            words[ptr + 9 + idx] = self.from[idx].to_bits();
            words[ptr + 12 + idx] = self.to[idx].to_bits();
            words[ptr + 15 + idx] = self.color[idx].to_bits();
            idx += 1;
        }
    }
}

#[cfg(not(target_arch = "spirv"))]
impl fmt::Display for DebugRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            Self::KIND_SAMPLE => write!(
                f,
                "sample #{}: light={} weight={}",
                self.nth, self.light_id, self.weight
            ),

            Self::KIND_RAY => write!(
                f,
                "ray #{}: light={} visible={} distance={}/{}",
                self.nth,
                self.light_id,
                self.is_visible,
                self.distance,
                self.max_distance
            ),

            kind => write!(f, "unknown record ({kind})"),
        }
    }
}

/// Append-only list of debug records, stored in a storage buffer.
///
/// Word zero counts pushed records; records past the capacity are dropped.
pub struct DebugLog<'a> {
    words: &'a mut [u32],
}

impl<'a> DebugLog<'a> {
    pub const CAPACITY: usize = 64;

    /// Number of `u32`s the backing buffer must have.
    pub const SIZE: usize = 1 + Self::CAPACITY * DebugRecord::SIZE;

    pub fn new(words: &'a mut [u32]) -> Self {
        Self { words }
    }

    pub fn push(&mut self, record: DebugRecord) {
        let idx = atomic_add(&mut self.words[0], 1) as usize;

        if idx < Self::CAPACITY {
            record.write(self.words, 1 + idx * DebugRecord::SIZE);
        }
    }

    pub fn len(words: &[u32]) -> usize {
        (words[0] as usize).min(Self::CAPACITY)
    }

    pub fn get(words: &[u32], idx: usize) -> DebugRecord {
        DebugRecord::read(words, 1 + idx * DebugRecord::SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log() {
        let mut words = vec![0; DebugLog::SIZE];
        let mut log = DebugLog::new(&mut words);

        let sample = DebugRecord::sample(
            uvec2(3, 2),
            1,
            7,
            0.25,
            Vec3::ZERO,
            Vec3::ONE,
            vec3(1.0, 0.5, 0.0),
        );

        let ray = DebugRecord::ray(
            uvec2(3, 2),
            0,
            7,
            false,
            1.5,
            3.0,
            Vec3::ZERO,
            Vec3::X,
        );

        log.push(sample);
        log.push(ray);

        assert_eq!(2, DebugLog::len(&words));
        assert_eq!(sample, DebugLog::get(&words, 0));
        assert_eq!(ray, DebugLog::get(&words, 1));
        assert_eq!(Vec3::X, ray.color);

        assert_eq!(
            "sample #1: light=7 weight=0.25",
            DebugLog::get(&words, 0).to_string()
        );

        assert_eq!(
            "ray #0: light=7 visible=false distance=1.5/3",
            DebugLog::get(&words, 1).to_string()
        );
    }

    #[test]
    fn overflow() {
        let mut words = vec![0; DebugLog::SIZE];
        let mut log = DebugLog::new(&mut words);

        for nth in 0..(DebugLog::CAPACITY as u32 + 10) {
            log.push(DebugRecord {
                nth,
                ..Default::default()
            });
        }

        assert_eq!(DebugLog::CAPACITY, DebugLog::len(&words));

        assert_eq!(
            DebugLog::CAPACITY as u32 - 1,
            DebugLog::get(&words, DebugLog::CAPACITY - 1).nth
        );
    }
}
