#![warn(missing_docs)]
//! Catalog of optical glasses described by Sellmeier coefficients
use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoEnumIterator};
use uom::si::f64::Length;

use super::{RefrIndexSellmeier1, RefractiveIndexType};
use crate::error::OpmResult;

/// Optical glasses with known dispersion.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, EnumString, strum::Display,
)]
pub enum Glass {
    /// Schott N-BK7
    #[serde(rename = "N-BK7")]
    #[strum(to_string = "N-BK7")]
    NBk7,
    /// Schott N-SF2
    #[serde(rename = "N-SF2")]
    #[strum(to_string = "N-SF2")]
    NSf2,
    /// Schott SF2
    #[serde(rename = "SF2")]
    #[strum(to_string = "SF2")]
    Sf2,
    /// Schott SF5
    #[serde(rename = "SF5")]
    #[strum(to_string = "SF5")]
    Sf5,
    /// Schott N-SF5
    #[serde(rename = "N-SF5")]
    #[strum(to_string = "N-SF5")]
    NSf5,
    /// Schott N-SF6HT
    #[serde(rename = "N-SF6HT")]
    #[strum(to_string = "N-SF6HT")]
    NSf6Ht,
    /// Schott N-SF10
    #[serde(rename = "N-SF10")]
    #[strum(to_string = "N-SF10")]
    NSf10,
    /// Schott N-SF11
    #[serde(rename = "N-SF11")]
    #[strum(to_string = "N-SF11")]
    NSf11,
    /// Schott N-BAF10
    #[serde(rename = "N-BAF10")]
    #[strum(to_string = "N-BAF10")]
    NBaf10,
    /// Schott N-BAK1
    #[serde(rename = "N-BAK1")]
    #[strum(to_string = "N-BAK1")]
    NBak1,
    /// Schott N-BAK4
    #[serde(rename = "N-BAK4")]
    #[strum(to_string = "N-BAK4")]
    NBak4,
    /// Ohara FK51A
    #[serde(rename = "FK51A")]
    #[strum(to_string = "FK51A")]
    Fk51a,
    /// Schott LAFN7
    #[serde(rename = "LAFN7")]
    #[strum(to_string = "LAFN7")]
    Lafn7,
    /// Schott N-LASF9
    #[serde(rename = "N-LASF9")]
    #[strum(to_string = "N-LASF9")]
    NLasf9,
    /// Schott N-LAK22
    #[serde(rename = "N-LAK22")]
    #[strum(to_string = "N-LAK22")]
    NLak22,
    /// Schott N-SSK5
    #[serde(rename = "N-SSK5")]
    #[strum(to_string = "N-SSK5")]
    NSsk5,
    /// Fused silica (Malitson)
    #[serde(rename = "FusedSilica")]
    #[strum(to_string = "FusedSilica")]
    FusedSilica,
}
impl Glass {
    /// Returns the Sellmeier model of this [`Glass`].
    #[must_use]
    pub fn sellmeier(self) -> RefrIndexSellmeier1 {
        let (k, l) = match self {
            Self::NBk7 => (
                [1.039_612_12, 0.231_792_344, 1.010_469_45],
                [0.006_000_698_67, 0.020_017_914_4, 103.560_653],
            ),
            Self::NSf2 => (
                [1.473_431_27, 0.163_681_849, 1.369_208_99],
                [0.010_901_909_8, 0.058_568_368_7, 127.404_933],
            ),
            Self::Sf2 => (
                [1.403_018_21, 0.231_767_504, 0.939_056_586],
                [0.010_579_546_6, 0.049_322_697_8, 112.405_955],
            ),
            Self::Sf5 => (
                [1.461_418_85, 0.247_713_019, 0.949_995_832],
                [0.011_182_612_6, 0.050_859_466_9, 112.041_888],
            ),
            Self::NSf5 => (
                [1.524_818_89, 0.187_085_527, 1.427_290_15],
                [0.011_254_756, 0.058_899_539_2, 129.141_675],
            ),
            Self::NSf6Ht => (
                [1.779_317_63, 0.338_149_866, 2.087_344_74],
                [0.013_371_418_2, 0.061_753_362_1, 174.017_59],
            ),
            Self::NSf10 => (
                [1.621_539_02, 0.256_287_842, 1.644_475_52],
                [0.012_224_145_7, 0.059_573_677_5, 147.468_793],
            ),
            Self::NSf11 => (
                [1.737_596_95, 0.313_747_346, 1.898_781_01],
                [0.013_188_707, 0.062_306_814_2, 155.236_29],
            ),
            Self::NBaf10 => (
                [1.585_149_5, 0.143_559_385, 1.085_212_69],
                [0.009_266_812_82, 0.042_448_980_5, 105.613_573],
            ),
            Self::NBak1 => (
                [1.123_656_62, 0.309_276_848, 0.881_511_957],
                [0.006_447_427_52, 0.022_228_440_2, 107.297_751],
            ),
            Self::NBak4 => (
                [1.288_346_42, 0.132_817_724, 0.945_395_373],
                [0.007_799_806_26, 0.031_563_117_7, 105.965_875],
            ),
            Self::Fk51a => (
                [0.971_247_817, 0.216_901_417, 0.904_651_666],
                [0.004_723_019_95, 0.015_357_561_2, 168.681_33],
            ),
            Self::Lafn7 => (
                [1.668_426_15, 0.298_512_803, 1.077_437_6],
                [0.010_315_999_9, 0.046_921_634_8, 82.507_850_9],
            ),
            Self::NLasf9 => (
                [2.000_295_47, 0.298_926_886, 1.806_918_43],
                [0.012_142_601_7, 0.053_873_623_6, 156.530_829],
            ),
            Self::NLak22 => (
                [1.142_297_81, 0.535_138_441, 1.040_883_85],
                [0.005_857_785_94, 0.019_854_614_7, 100.834_017],
            ),
            Self::NSsk5 => (
                [1.592_226_59, 0.103_520_774, 1.051_740_16],
                [0.009_202_846_26, 0.042_353_007_2, 106.927_374],
            ),
            Self::FusedSilica => (
                [0.696_166_3, 0.407_942_6, 0.897_479_4],
                [
                    0.068_404_3 * 0.068_404_3,
                    0.116_241_4 * 0.116_241_4,
                    9.896_161 * 9.896_161,
                ],
            ),
        };
        RefrIndexSellmeier1::new(k[0], k[1], k[2], l[0], l[1], l[2])
    }
    /// Returns the refractive index of this [`Glass`] at the given wavelength.
    ///
    /// # Errors
    ///
    /// This function will return an error if the wavelength is outside the valid range `0 < λ <= 10 µm`.
    pub fn n(self, wavelength: Length) -> OpmResult<f64> {
        RefractiveIndexType::from(self).get_refractive_index(wavelength)
    }
    /// Returns the names of all available glasses.
    #[must_use]
    pub fn names() -> Vec<String> {
        Self::iter().map(|g| g.to_string()).collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{error::MatrixOpticsError, micrometer};
    use approx::assert_relative_eq;
    use assert_matches::assert_matches;
    use std::str::FromStr;
    #[test]
    fn n_at_5um() {
        let expected = [
            (Glass::NBk7, 1.396_525_224_350_663_6),
            (Glass::NSf2, 1.517_852_712_122_697_5),
            (Glass::Sf2, 1.538_586_134_807_733_7),
            (Glass::Sf5, 1.561_228_648_980_111_5),
            (Glass::NSf5, 1.539_610_715_563_772),
            (Glass::NSf6Ht, 1.664_053_106_820_355),
            (Glass::NSf10, 1.594_847_810_656_214_7),
            (Glass::NSf11, 1.639_682_178_937_751_1),
            (Glass::NBaf10, 1.546_930_214_617_120_2),
            (Glass::NBak1, 1.471_637_612_596_669_3),
            (Glass::NBak4, 1.459_391_121_152_617),
            (Glass::Fk51a, 1.425_152_681_134_275_2),
            (Glass::Lafn7, 1.581_076_165_264_107_4),
            (Glass::NLasf9, 1.719_709_232_483_510_2),
            (Glass::NLak22, 1.528_065_402_814_606),
            (Glass::NSsk5, 1.541_289_278_092_723),
            (Glass::FusedSilica, 1.340_457_289_491_436_8),
        ];
        assert_eq!(expected.len(), Glass::iter().count());
        for (glass, n) in expected {
            assert_relative_eq!(glass.n(micrometer!(5.0)).unwrap(), n, max_relative = 1e-12);
        }
    }
    #[test]
    fn out_of_range() {
        for glass in Glass::iter() {
            assert_matches!(glass.n(micrometer!(100.0)), Err(MatrixOpticsError::Material(_)));
            assert_matches!(glass.n(micrometer!(0.0)), Err(MatrixOpticsError::Material(_)));
            assert_matches!(glass.n(micrometer!(-100.0)), Err(MatrixOpticsError::Material(_)));
        }
    }
    #[test]
    fn names() {
        assert_eq!(Glass::NBk7.to_string(), "N-BK7");
        assert_eq!(Glass::from_str("N-SF11").unwrap(), Glass::NSf11);
        assert!(Glass::from_str("BK7").is_err());
        assert_eq!(Glass::names().len(), 17);
    }
    #[test]
    fn serde() {
        let yaml = serde_yaml::to_string(&Glass::NBaf10).unwrap();
        assert_eq!(yaml.trim(), "N-BAF10");
        let glass: Glass = serde_yaml::from_str("FusedSilica").unwrap();
        assert_eq!(glass, Glass::FusedSilica);
    }
}
