use serde::{Deserialize, Serialize};

/// Discrete half-point maturity band selected from a continuous preliminary score.
///
/// The band keys double as the object keys of the scoring map files, so the
/// serialized form must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Bracket {
    #[serde(rename = "score_1")]
    B1,
    #[serde(rename = "score_1_5")]
    B1_5,
    #[serde(rename = "score_2")]
    B2,
    #[serde(rename = "score_2_5")]
    B2_5,
    #[serde(rename = "score_3")]
    B3,
    #[serde(rename = "score_3_5")]
    B3_5,
    #[serde(rename = "score_4")]
    B4,
    #[serde(rename = "score_4_5")]
    B4_5,
    #[serde(rename = "score_5")]
    B5,
}

impl Bracket {
    /// All nine bands in ascending order. Scoring maps must define a rubric for each.
    pub const ALL: [Bracket; 9] = [
        Bracket::B1,
        Bracket::B1_5,
        Bracket::B2,
        Bracket::B2_5,
        Bracket::B3,
        Bracket::B3_5,
        Bracket::B4,
        Bracket::B4_5,
        Bracket::B5,
    ];

    /// Select the band for a continuous preliminary score.
    ///
    /// Bands are half-open: `[1.0, 1.5)` maps to `B1`, up through `[4.5, 5.0)`
    /// for `B4_5`; anything at or above 5.0 lands in `B5`. Scores below 1.0
    /// (and NaN) clamp to `B1`; the preliminary score is produced upstream on
    /// a 1-5 scale, so out-of-range inputs are treated as the lowest band
    /// rather than rejected.
    pub fn for_score(score: f64) -> Bracket {
        if score >= 5.0 {
            Bracket::B5
        } else if score >= 4.5 {
            Bracket::B4_5
        } else if score >= 4.0 {
            Bracket::B4
        } else if score >= 3.5 {
            Bracket::B3_5
        } else if score >= 3.0 {
            Bracket::B3
        } else if score >= 2.5 {
            Bracket::B2_5
        } else if score >= 2.0 {
            Bracket::B2
        } else if score >= 1.5 {
            Bracket::B1_5
        } else {
            Bracket::B1
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Bracket::B1 => "score_1",
            Bracket::B1_5 => "score_1_5",
            Bracket::B2 => "score_2",
            Bracket::B2_5 => "score_2_5",
            Bracket::B3 => "score_3",
            Bracket::B3_5 => "score_3_5",
            Bracket::B4 => "score_4",
            Bracket::B4_5 => "score_4_5",
            Bracket::B5 => "score_5",
        }
    }

    pub fn from_key(key: &str) -> Option<Bracket> {
        Bracket::ALL
            .into_iter()
            .find(|bracket| bracket.key() == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_samples_resolve_per_band_table() {
        assert_eq!(Bracket::for_score(1.0), Bracket::B1);
        assert_eq!(Bracket::for_score(1.45), Bracket::B1);
        assert_eq!(Bracket::for_score(1.5), Bracket::B1_5);
        assert_eq!(Bracket::for_score(2.45), Bracket::B2);
        assert_eq!(Bracket::for_score(2.5), Bracket::B2_5);
        assert_eq!(Bracket::for_score(4.4999), Bracket::B4);
        assert_eq!(Bracket::for_score(4.6), Bracket::B4_5);
        assert_eq!(Bracket::for_score(5.0), Bracket::B5);
        assert_eq!(Bracket::for_score(7.3), Bracket::B5);
    }

    #[test]
    fn every_score_in_range_matches_exactly_one_band() {
        let mut score = 1.0;
        while score < 5.0 {
            let bracket = Bracket::for_score(score);
            let matches = Bracket::ALL
                .into_iter()
                .filter(|candidate| *candidate == bracket)
                .count();
            assert_eq!(matches, 1, "score {score} should land in one band");
            score += 0.01;
        }
    }

    #[test]
    fn out_of_range_low_clamps_to_lowest_band() {
        assert_eq!(Bracket::for_score(0.2), Bracket::B1);
        assert_eq!(Bracket::for_score(-3.0), Bracket::B1);
        assert_eq!(Bracket::for_score(f64::NAN), Bracket::B1);
    }

    #[test]
    fn keys_round_trip() {
        for bracket in Bracket::ALL {
            assert_eq!(Bracket::from_key(bracket.key()), Some(bracket));
        }
        assert_eq!(Bracket::from_key("score_6"), None);
    }

    #[test]
    fn serializes_as_map_key_token() {
        let json = serde_json::to_string(&Bracket::B3_5).expect("serializes");
        assert_eq!(json, "\"score_3_5\"");
    }
}
