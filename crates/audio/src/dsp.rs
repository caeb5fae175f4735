/// Conversion of device samples to unsigned 8-bit PCM, where 128 is silence.
pub trait ToU8Sample: Copy {
    fn to_u8_sample(self) -> u8;
}

impl ToU8Sample for u8 {
    fn to_u8_sample(self) -> u8 {
        self
    }
}

impl ToU8Sample for i8 {
    fn to_u8_sample(self) -> u8 {
        (self as u8) ^ 0x80
    }
}

impl ToU8Sample for u16 {
    fn to_u8_sample(self) -> u8 {
        (self >> 8) as u8
    }
}

impl ToU8Sample for i16 {
    fn to_u8_sample(self) -> u8 {
        ((self as i32 + 32_768) >> 8) as u8
    }
}

impl ToU8Sample for i32 {
    fn to_u8_sample(self) -> u8 {
        ((self as i64 + 2_147_483_648) >> 24) as u8
    }
}

impl ToU8Sample for f32 {
    fn to_u8_sample(self) -> u8 {
        let sample = if self.is_nan() { 0.0 } else { self.clamp(-1.0, 1.0) };
        ((sample * 0.5 + 0.5) * 255.0).round() as u8
    }
}

impl ToU8Sample for f64 {
    fn to_u8_sample(self) -> u8 {
        (self as f32).to_u8_sample()
    }
}

/// Regroups host buffers of any size into fixed-length periods of u8 PCM.
///
/// The pending buffer is allocated once with room for exactly one period, so
/// pushing never reallocates.
#[derive(Debug)]
pub struct PeriodChunker {
    pending: Vec<u8>,
    period_len: usize,
}

impl PeriodChunker {
    pub fn new(period_len: usize) -> Self {
        let period_len = period_len.max(1);
        Self {
            pending: Vec::with_capacity(period_len),
            period_len,
        }
    }

    pub fn period_len(&self) -> usize {
        self.period_len
    }

    /// Samples carried over to the next push.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Converts `input` and calls `on_period` once for every full period.
    pub fn push<T: ToU8Sample>(&mut self, input: &[T], mut on_period: impl FnMut(&[u8])) {
        for sample in input {
            self.pending.push(sample.to_u8_sample());
            if self.pending.len() == self.period_len {
                on_period(&self.pending);
                self.pending.clear();
            }
        }
    }
}
