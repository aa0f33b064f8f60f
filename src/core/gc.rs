#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct BaseCounts {
    pub a: u64,
    pub c: u64,
    pub g: u64,
    pub t: u64,
}

impl BaseCounts {
    pub fn acgt(&self) -> u64 {
        self.a + self.c + self.g + self.t
    }
}

/// Counts canonical bases, case-insensitively. Ambiguity codes and any other
/// byte are ignored.
pub fn count_bases(seq: &[u8]) -> BaseCounts {
    let mut counts = BaseCounts::default();
    for &b in seq {
        match b & 0xDF {
            b'A' => counts.a += 1,
            b'C' => counts.c += 1,
            b'G' => counts.g += 1,
            b'T' => counts.t += 1,
            _ => {}
        }
    }
    counts
}

/// Fraction of G/C among A/T/G/C bases; 0 when none of the four are present.
pub fn gc_content(seq: &[u8]) -> f64 {
    let counts = count_bases(seq);
    let total = counts.acgt();
    if total == 0 {
        return 0.0;
    }
    (counts.g + counts.c) as f64 / total as f64
}
