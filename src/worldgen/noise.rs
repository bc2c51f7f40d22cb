//! Seeded coherent-noise sampling
//!
//! Every channel is an independent Perlin field derived from the world seed
//! with a fixed offset, so elevation, moisture, rivers and the rest never
//! correlate with each other.

use noise::{NoiseFn, Perlin};

/// Independent noise channels with their seed offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoiseChannel {
    Elevation,
    Moisture,
    Temperature,
    Resource,
    River,
    Feature,
    Blend,
    Continent,
    Detail,
}

impl NoiseChannel {
    pub const ALL: [NoiseChannel; 9] = [
        NoiseChannel::Elevation,
        NoiseChannel::Moisture,
        NoiseChannel::Temperature,
        NoiseChannel::Resource,
        NoiseChannel::River,
        NoiseChannel::Feature,
        NoiseChannel::Blend,
        NoiseChannel::Continent,
        NoiseChannel::Detail,
    ];

    pub fn seed_offset(self) -> u64 {
        match self {
            NoiseChannel::Elevation => 0,
            NoiseChannel::Moisture => 1000,
            NoiseChannel::Temperature => 2000,
            NoiseChannel::Resource => 3000,
            NoiseChannel::River => 4000,
            NoiseChannel::Feature => 5000,
            NoiseChannel::Blend => 6000,
            NoiseChannel::Continent => 7000,
            NoiseChannel::Detail => 8000,
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// Fold a 64-bit world seed plus offset into the 32-bit seed Perlin expects
pub fn channel_seed(seed: u64, offset: u64) -> u32 {
    let s = seed.wrapping_add(offset);
    (s ^ (s >> 32)) as u32
}

/// A single seeded 2D noise field
#[derive(Clone, Debug)]
pub struct NoiseField {
    perlin: Perlin,
}

impl NoiseField {
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
        }
    }

    /// Raw sample in [-1, 1]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        self.perlin.get([x, y]).clamp(-1.0, 1.0)
    }

    /// Fractal sum of `octaves` samples at doubling frequency and halving
    /// amplitude, normalized to [0, 1]
    pub fn multi_octave(&self, x: f64, y: f64, scale: f64, octaves: u32) -> f64 {
        let octaves = octaves.max(1);
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0 / scale;
        let mut amplitude_sum = 0.0;

        for _ in 0..octaves {
            total += self.sample(x * frequency, y * frequency) * amplitude;
            amplitude_sum += amplitude;
            amplitude *= 0.5;
            frequency *= 2.0;
        }

        ((total / amplitude_sum + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}

/// One-off sample; prefer a long-lived [`NoiseField`] in loops
pub fn sample(seed: u32, x: f64, y: f64) -> f64 {
    NoiseField::new(seed).sample(x, y)
}

/// One-off multi-octave sample in [0, 1]
pub fn multi_octave_sample(seed: u32, x: f64, y: f64, scale: f64, octaves: u32) -> f64 {
    NoiseField::new(seed).multi_octave(x, y, scale, octaves)
}

/// All channels for one world seed
#[derive(Clone, Debug)]
pub struct NoiseBank {
    seed: u64,
    fields: Vec<NoiseField>,
}

impl NoiseBank {
    pub fn new(seed: u64) -> Self {
        let fields = NoiseChannel::ALL
            .iter()
            .map(|ch| NoiseField::new(channel_seed(seed, ch.seed_offset())))
            .collect();
        Self { seed, fields }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn channel(&self, channel: NoiseChannel) -> &NoiseField {
        &self.fields[channel.slot()]
    }

    pub fn sample(&self, channel: NoiseChannel, x: f64, y: f64) -> f64 {
        self.channel(channel).sample(x, y)
    }

    pub fn multi(&self, channel: NoiseChannel, x: f64, y: f64, scale: f64, octaves: u32) -> f64 {
        self.channel(channel).multi_octave(x, y, scale, octaves)
    }
}
