use rand::Rng;
use rand::distr::{Distribution, StandardUniform};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartPattern {
    DoubleTop,
    DoubleBottom,
    HeadAndShoulders,
    Triangle,
    Channel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trend {
    Uptrend,
    Downtrend,
    Sideways,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VolumeTrend {
    Increasing,
    Decreasing,
    Stable,
}

impl ChartPattern {
    pub const ALL: [ChartPattern; 5] = [
        ChartPattern::DoubleTop,
        ChartPattern::DoubleBottom,
        ChartPattern::HeadAndShoulders,
        ChartPattern::Triangle,
        ChartPattern::Channel,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ChartPattern::DoubleTop => "Double Top",
            ChartPattern::DoubleBottom => "Double Bottom",
            ChartPattern::HeadAndShoulders => "Head and Shoulders",
            ChartPattern::Triangle => "Triangle",
            ChartPattern::Channel => "Channel",
        }
    }
}

impl Trend {
    pub const ALL: [Trend; 3] = [Trend::Uptrend, Trend::Downtrend, Trend::Sideways];

    pub fn name(&self) -> &'static str {
        match self {
            Trend::Uptrend => "Uptrend",
            Trend::Downtrend => "Downtrend",
            Trend::Sideways => "Sideways",
        }
    }
}

impl VolumeTrend {
    pub const ALL: [VolumeTrend; 3] = [
        VolumeTrend::Increasing,
        VolumeTrend::Decreasing,
        VolumeTrend::Stable,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            VolumeTrend::Increasing => "Increasing",
            VolumeTrend::Decreasing => "Decreasing",
            VolumeTrend::Stable => "Stable",
        }
    }
}

// Uniform sampling so callers can write `rng.random::<ChartPattern>()`

impl Distribution<ChartPattern> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ChartPattern {
        ChartPattern::ALL[rng.random_range(0..ChartPattern::ALL.len())]
    }
}

impl Distribution<Trend> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Trend {
        Trend::ALL[rng.random_range(0..Trend::ALL.len())]
    }
}

impl Distribution<VolumeTrend> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> VolumeTrend {
        VolumeTrend::ALL[rng.random_range(0..VolumeTrend::ALL.len())]
    }
}

impl fmt::Display for ChartPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for VolumeTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn sampling_reaches_every_pattern() {
        let mut rng = StdRng::seed_from_u64(11);
        let seen: HashSet<ChartPattern> = (0..500).map(|_| rng.random()).collect();
        assert_eq!(seen.len(), ChartPattern::ALL.len());
    }

    #[test]
    fn display_uses_chart_vocabulary() {
        assert_eq!(ChartPattern::HeadAndShoulders.to_string(), "Head and Shoulders");
        assert_eq!(Trend::Sideways.to_string(), "Sideways");
        assert_eq!(VolumeTrend::Stable.to_string(), "Stable");
    }
}
