//! 2-D wavelet transforms over segment matrices.
//!
//! A wavelet is a record of four filter coefficient arrays (decomposition
//! and reconstruction, low and high pass). The forward 1-D step is a
//! circular convolution at stride 2; synthesis applies the reconstruction
//! filters time-reversed, which makes the periodized orthonormal bank its
//! own transpose and the round trip exact at every dyadic length.
//!
//! FWT cascades over decreasing prefix lengths (n, n/2, ..., 2), rows
//! then columns. WPT recurses into both halves at every level.
//!
//! Several named wavelet identities alias a smaller set of banks; the
//! mapping is frozen because it is part of the stream contract.

use crate::config::{TransformType, WaveletType};
use crate::planes::Matrix;

/// A discrete filter bank.
#[derive(Debug)]
pub struct Wavelet {
    name: &'static str,
    lpd: &'static [f64],
    hpd: &'static [f64],
    lpr: &'static [f64],
    hpr: &'static [f64],
}

impl Wavelet {
    /// Human-readable bank name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Filter length in taps.
    #[must_use]
    pub fn filter_len(&self) -> usize {
        self.lpd.len()
    }

    /// Resolve a wire identity to its filter bank.
    ///
    /// The alias table folds the named variants without a stored bank onto
    /// the nearest available one; unmapped names (including the
    /// biorthogonal block and DB5..DB10) land on Haar.
    #[must_use]
    pub fn for_type(t: WaveletType) -> &'static Wavelet {
        match t {
            WaveletType::Haar | WaveletType::HaarOrthogonal => &HAAR,
            WaveletType::Daubechies2 => &DAUBECHIES2,
            WaveletType::Daubechies3 | WaveletType::Daubechies4 => &DAUBECHIES4,
            WaveletType::Symlet2 | WaveletType::Symlet3 | WaveletType::Symlet4 => &SYMLET4,
            WaveletType::Symlet5
            | WaveletType::Symlet6
            | WaveletType::Symlet7
            | WaveletType::Symlet8
            | WaveletType::Symlet9
            | WaveletType::Symlet10 => &SYMLET8,
            WaveletType::Coiflet1
            | WaveletType::Coiflet2
            | WaveletType::Coiflet3
            | WaveletType::Coiflet4
            | WaveletType::Coiflet5 => &COIFLET2,
            _ => &HAAR,
        }
    }
}

// ── Filter banks ───────────────────────────────────────────────

static HAAR: Wavelet = Wavelet {
    name: "Haar",
    lpd: &[0.707_106_781_186_547_6, 0.707_106_781_186_547_6],
    hpd: &[-0.707_106_781_186_547_6, 0.707_106_781_186_547_6],
    lpr: &[0.707_106_781_186_547_6, 0.707_106_781_186_547_6],
    hpr: &[0.707_106_781_186_547_6, -0.707_106_781_186_547_6],
};

static DAUBECHIES2: Wavelet = Wavelet {
    name: "Daubechies2",
    lpd: &[
        -0.129_409_522_550_921_45,
        0.224_143_868_041_857_35,
        0.836_516_303_737_469,
        0.482_962_913_144_690_25,
    ],
    hpd: &[
        -0.482_962_913_144_690_25,
        0.836_516_303_737_469,
        -0.224_143_868_041_857_35,
        -0.129_409_522_550_921_45,
    ],
    lpr: &[
        0.482_962_913_144_690_25,
        0.836_516_303_737_469,
        0.224_143_868_041_857_35,
        -0.129_409_522_550_921_45,
    ],
    hpr: &[
        -0.129_409_522_550_921_45,
        -0.224_143_868_041_857_35,
        0.836_516_303_737_469,
        -0.482_962_913_144_690_25,
    ],
};

static DAUBECHIES4: Wavelet = Wavelet {
    name: "Daubechies4",
    lpd: &[
        -0.010_597_401_784_997_278,
        0.032_883_011_666_982_945,
        0.030_841_381_835_986_965,
        -0.187_034_811_718_881_14,
        -0.027_983_769_416_983_85,
        0.630_880_767_929_590_4,
        0.714_846_570_552_541_5,
        0.230_377_813_308_855_23,
    ],
    hpd: &[
        -0.230_377_813_308_855_23,
        0.714_846_570_552_541_5,
        -0.630_880_767_929_590_4,
        -0.027_983_769_416_983_85,
        0.187_034_811_718_881_14,
        0.030_841_381_835_986_965,
        -0.032_883_011_666_982_945,
        -0.010_597_401_784_997_278,
    ],
    lpr: &[
        0.230_377_813_308_855_23,
        0.714_846_570_552_541_5,
        0.630_880_767_929_590_4,
        -0.027_983_769_416_983_85,
        -0.187_034_811_718_881_14,
        0.030_841_381_835_986_965,
        0.032_883_011_666_982_945,
        -0.010_597_401_784_997_278,
    ],
    hpr: &[
        -0.010_597_401_784_997_278,
        -0.032_883_011_666_982_945,
        0.030_841_381_835_986_965,
        0.187_034_811_718_881_14,
        -0.027_983_769_416_983_85,
        -0.630_880_767_929_590_4,
        0.714_846_570_552_541_5,
        -0.230_377_813_308_855_23,
    ],
};

static SYMLET4: Wavelet = Wavelet {
    name: "Symlet4",
    lpd: &[
        -0.075_765_714_789_273_33,
        -0.029_635_527_645_998_51,
        0.497_618_667_632_015_45,
        0.803_738_751_805_916_1,
        0.297_857_795_605_277_36,
        -0.099_219_543_576_847_22,
        -0.012_603_967_262_037_833,
        0.032_223_100_604_042_702,
    ],
    hpd: &[
        -0.032_223_100_604_042_702,
        -0.012_603_967_262_037_833,
        0.099_219_543_576_847_22,
        0.297_857_795_605_277_36,
        -0.803_738_751_805_916_1,
        0.497_618_667_632_015_45,
        0.029_635_527_645_998_51,
        -0.075_765_714_789_273_33,
    ],
    lpr: &[
        0.032_223_100_604_042_702,
        -0.012_603_967_262_037_833,
        -0.099_219_543_576_847_22,
        0.297_857_795_605_277_36,
        0.803_738_751_805_916_1,
        0.497_618_667_632_015_45,
        -0.029_635_527_645_998_51,
        -0.075_765_714_789_273_33,
    ],
    hpr: &[
        -0.075_765_714_789_273_33,
        0.029_635_527_645_998_51,
        0.497_618_667_632_015_45,
        -0.803_738_751_805_916_1,
        0.297_857_795_605_277_36,
        0.099_219_543_576_847_22,
        -0.012_603_967_262_037_833,
        -0.032_223_100_604_042_702,
    ],
};

static SYMLET8: Wavelet = Wavelet {
    name: "Symlet8",
    lpd: &[
        -0.003_382_415_951_006_125_6,
        -0.000_542_132_331_791_148_1,
        0.031_695_087_811_492_98,
        0.007_607_487_324_917_605,
        -0.143_294_238_350_809_7,
        -0.061_273_359_067_658_524,
        0.481_359_651_258_372_2,
        0.777_185_751_699_747_8,
        0.364_441_894_835_331_4,
        -0.051_945_838_107_709_04,
        -0.027_219_029_917_056_003,
        0.049_137_179_673_607_506,
        0.003_808_752_013_890_615,
        -0.014_952_258_337_048_23,
        -0.000_302_920_514_721_366_8,
        0.001_889_950_332_759_460_9,
    ],
    hpd: &[
        -0.001_889_950_332_759_460_9,
        -0.000_302_920_514_721_366_8,
        0.014_952_258_337_048_23,
        0.003_808_752_013_890_615,
        -0.049_137_179_673_607_506,
        -0.027_219_029_917_056_003,
        0.051_945_838_107_709_04,
        0.364_441_894_835_331_4,
        -0.777_185_751_699_747_8,
        0.481_359_651_258_372_2,
        0.061_273_359_067_658_524,
        -0.143_294_238_350_809_7,
        -0.007_607_487_324_917_605,
        0.031_695_087_811_492_98,
        0.000_542_132_331_791_148_1,
        -0.003_382_415_951_006_125_6,
    ],
    lpr: &[
        0.001_889_950_332_759_460_9,
        -0.000_302_920_514_721_366_8,
        -0.014_952_258_337_048_23,
        0.003_808_752_013_890_615,
        0.049_137_179_673_607_506,
        -0.027_219_029_917_056_003,
        -0.051_945_838_107_709_04,
        0.364_441_894_835_331_4,
        0.777_185_751_699_747_8,
        0.481_359_651_258_372_2,
        -0.061_273_359_067_658_524,
        -0.143_294_238_350_809_7,
        0.007_607_487_324_917_605,
        0.031_695_087_811_492_98,
        -0.000_542_132_331_791_148_1,
        -0.003_382_415_951_006_125_6,
    ],
    hpr: &[
        -0.003_382_415_951_006_125_6,
        0.000_542_132_331_791_148_1,
        0.031_695_087_811_492_98,
        -0.007_607_487_324_917_605,
        -0.143_294_238_350_809_7,
        0.061_273_359_067_658_524,
        0.481_359_651_258_372_2,
        -0.777_185_751_699_747_8,
        0.364_441_894_835_331_4,
        0.051_945_838_107_709_04,
        -0.027_219_029_917_056_003,
        -0.049_137_179_673_607_506,
        0.003_808_752_013_890_615,
        0.014_952_258_337_048_23,
        -0.000_302_920_514_721_366_8,
        -0.001_889_950_332_759_460_9,
    ],
};

static COIFLET2: Wavelet = Wavelet {
    name: "Coiflet2",
    lpd: &[
        0.000_720_549_445_364_512_2,
        -0.001_823_208_870_702_993_2,
        -0.005_611_434_819_394_499_5,
        0.023_680_171_946_334_084,
        0.059_434_418_646_456_9,
        -0.076_488_599_078_306_4,
        -0.417_005_184_421_692_54,
        0.812_723_635_445_542_3,
        0.386_110_066_821_162_2,
        -0.067_372_554_721_963_02,
        -0.041_464_936_781_759_15,
        0.016_387_336_463_522_112,
    ],
    hpd: &[
        -0.016_387_336_463_522_112,
        -0.041_464_936_781_759_15,
        0.067_372_554_721_963_02,
        0.386_110_066_821_162_2,
        -0.812_723_635_445_542_3,
        -0.417_005_184_421_692_54,
        0.076_488_599_078_306_4,
        0.059_434_418_646_456_9,
        -0.023_680_171_946_334_084,
        -0.005_611_434_819_394_499_5,
        0.001_823_208_870_702_993_2,
        0.000_720_549_445_364_512_2,
    ],
    lpr: &[
        0.016_387_336_463_522_112,
        -0.041_464_936_781_759_15,
        -0.067_372_554_721_963_02,
        0.386_110_066_821_162_2,
        0.812_723_635_445_542_3,
        -0.417_005_184_421_692_54,
        -0.076_488_599_078_306_4,
        0.059_434_418_646_456_9,
        0.023_680_171_946_334_084,
        -0.005_611_434_819_394_499_5,
        -0.001_823_208_870_702_993_2,
        0.000_720_549_445_364_512_2,
    ],
    hpr: &[
        0.000_720_549_445_364_512_2,
        0.001_823_208_870_702_993_2,
        -0.005_611_434_819_394_499_5,
        -0.023_680_171_946_334_084,
        0.059_434_418_646_456_9,
        0.076_488_599_078_306_4,
        -0.417_005_184_421_692_54,
        -0.812_723_635_445_542_3,
        0.386_110_066_821_162_2,
        0.067_372_554_721_963_02,
        -0.041_464_936_781_759_15,
        -0.016_387_336_463_522_112,
    ],
};

// ── 1-D steps ──────────────────────────────────────────────────

/// One analysis step: `data[0..n]` becomes `[low..., high...]`.
fn forward_step(w: &Wavelet, data: &mut [f64], scratch: &mut Vec<f64>) {
    let n = data.len();
    if n < 2 {
        return;
    }
    let half = n / 2;
    let filter_len = w.lpd.len();

    scratch.clear();
    scratch.resize(n, 0.0);
    for i in 0..half {
        let mut low = 0.0;
        let mut high = 0.0;
        for j in 0..filter_len {
            let idx = (2 * i + j) % n;
            low += w.lpd[j] * data[idx];
            high += w.hpd[j] * data[idx];
        }
        scratch[i] = low;
        scratch[half + i] = high;
    }
    data.copy_from_slice(scratch);
}

/// One synthesis step: `[low..., high...]` becomes `data[0..n]`.
///
/// The reconstruction filters run time-reversed; with the stock
/// orthonormal banks this is the transpose of the analysis step, so the
/// pair reconstructs exactly at any even length.
fn inverse_step(w: &Wavelet, data: &mut [f64], scratch: &mut Vec<f64>) {
    let n = data.len();
    if n < 2 {
        return;
    }
    let half = n / 2;
    let filter_len = w.lpr.len();

    scratch.clear();
    scratch.resize(n, 0.0);
    for i in 0..half {
        let low = data[i];
        let high = data[half + i];
        for j in 0..filter_len {
            let idx = (2 * i + j) % n;
            scratch[idx] += w.lpr[filter_len - 1 - j] * low + w.hpr[filter_len - 1 - j] * high;
        }
    }
    data.copy_from_slice(scratch);
}

fn packet_forward(w: &Wavelet, data: &mut [f64], level: i32, scratch: &mut Vec<f64>) {
    if level <= 0 || data.len() < 2 {
        return;
    }
    forward_step(w, data, scratch);
    let half = data.len() / 2;
    let (low, high) = data.split_at_mut(half);
    packet_forward(w, low, level - 1, scratch);
    packet_forward(w, high, level - 1, scratch);
}

fn packet_inverse(w: &Wavelet, data: &mut [f64], level: i32, scratch: &mut Vec<f64>) {
    if level <= 0 || data.len() < 2 {
        return;
    }
    let half = data.len() / 2;
    {
        let (low, high) = data.split_at_mut(half);
        packet_inverse(w, low, level - 1, scratch);
        packet_inverse(w, high, level - 1, scratch);
    }
    inverse_step(w, data, scratch);
}

// ── 2-D transforms ─────────────────────────────────────────────

/// 2-D transform: a filter bank plus the FWT/WPT cascade choice.
#[derive(Debug)]
pub struct WaveletTransform {
    wavelet: &'static Wavelet,
    kind: TransformType,
}

impl WaveletTransform {
    /// Pair a cascade kind with a bank.
    #[must_use]
    pub fn new(kind: TransformType, wavelet: &'static Wavelet) -> Self {
        Self { wavelet, kind }
    }

    /// Bank in use.
    #[must_use]
    pub fn wavelet(&self) -> &'static Wavelet {
        self.wavelet
    }

    /// Cascade name ("FWT" or "WPT").
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Forward 2-D transform in place.
    pub fn forward(&self, m: &mut Matrix) {
        match self.kind {
            TransformType::Wpt => self.wpt(m, true),
            TransformType::Fwt | TransformType::Random => self.fwt_forward(m),
        }
    }

    /// Inverse 2-D transform in place.
    pub fn inverse(&self, m: &mut Matrix) {
        match self.kind {
            TransformType::Wpt => self.wpt(m, false),
            TransformType::Fwt | TransformType::Random => self.fwt_inverse(m),
        }
    }

    fn fwt_forward(&self, m: &mut Matrix) {
        let size = m.size();
        let mut scratch = Vec::new();
        let mut col = vec![0.0; size];

        for x in 0..size {
            let row = m.row_mut(x);
            let mut len = size;
            while len >= 2 {
                forward_step(self.wavelet, &mut row[..len], &mut scratch);
                len /= 2;
            }
        }

        for y in 0..size {
            for x in 0..size {
                col[x] = m.get(x, y);
            }
            let mut len = size;
            while len >= 2 {
                forward_step(self.wavelet, &mut col[..len], &mut scratch);
                len /= 2;
            }
            for x in 0..size {
                m.set(x, y, col[x]);
            }
        }
    }

    fn fwt_inverse(&self, m: &mut Matrix) {
        let size = m.size();
        let mut scratch = Vec::new();
        let mut col = vec![0.0; size];

        for y in 0..size {
            for x in 0..size {
                col[x] = m.get(x, y);
            }
            let mut len = 2;
            while len <= size {
                inverse_step(self.wavelet, &mut col[..len], &mut scratch);
                len *= 2;
            }
            for x in 0..size {
                m.set(x, y, col[x]);
            }
        }

        for x in 0..size {
            let row = m.row_mut(x);
            let mut len = 2;
            while len <= size {
                inverse_step(self.wavelet, &mut row[..len], &mut scratch);
                len *= 2;
            }
        }
    }

    fn wpt(&self, m: &mut Matrix, forward: bool) {
        let size = m.size();
        if size < 2 {
            return;
        }
        let levels = size.ilog2() as i32;
        let mut scratch = Vec::new();
        let mut col = vec![0.0; size];

        if forward {
            for x in 0..size {
                packet_forward(self.wavelet, m.row_mut(x), levels, &mut scratch);
            }
            for y in 0..size {
                for x in 0..size {
                    col[x] = m.get(x, y);
                }
                packet_forward(self.wavelet, &mut col, levels, &mut scratch);
                for x in 0..size {
                    m.set(x, y, col[x]);
                }
            }
        } else {
            for y in 0..size {
                for x in 0..size {
                    col[x] = m.get(x, y);
                }
                packet_inverse(self.wavelet, &mut col, levels, &mut scratch);
                for x in 0..size {
                    m.set(x, y, col[x]);
                }
            }
            for x in 0..size {
                packet_inverse(self.wavelet, m.row_mut(x), levels, &mut scratch);
            }
        }
    }
}

// ── Magnitude compression ──────────────────────────────────────

/// Zeroes every coefficient below a magnitude threshold.
#[derive(Clone, Copy, Debug)]
pub struct MagnitudeCompressor {
    threshold: f64,
}

impl MagnitudeCompressor {
    /// Compressor with the given absolute threshold.
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Zero all cells with `|v| < threshold`.
    pub fn compress(&self, m: &mut Matrix) {
        for v in m.cells_mut() {
            if v.abs() < self.threshold {
                *v = 0.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BANKS: [&Wavelet; 5] = [&HAAR, &DAUBECHIES2, &DAUBECHIES4, &SYMLET4, &SYMLET8];

    fn test_matrix(size: usize) -> Matrix {
        let mut m = Matrix::new(size);
        for x in 0..size {
            for y in 0..size {
                m.set(x, y, ((x * 31 + y * 7 + 13) % 97) as f64 / 97.0 - 0.3);
            }
        }
        m
    }

    fn max_abs_diff(a: &Matrix, b: &Matrix) -> f64 {
        a.cells()
            .iter()
            .zip(b.cells().iter())
            .map(|(x, y)| (x - y).abs())
            .fold(0.0, f64::max)
    }

    #[test]
    fn test_fwt_roundtrip_all_banks() {
        for w in BANKS {
            let tr = WaveletTransform::new(TransformType::Fwt, w);
            let original = test_matrix(8);
            let mut m = original.clone();
            tr.forward(&mut m);
            tr.inverse(&mut m);
            let diff = max_abs_diff(&original, &m);
            assert!(diff < 1e-9, "{} FWT roundtrip error {diff}", w.name());
        }
    }

    #[test]
    fn test_fwt_roundtrip_coiflet() {
        let tr = WaveletTransform::new(TransformType::Fwt, &COIFLET2);
        let original = test_matrix(16);
        let mut m = original.clone();
        tr.forward(&mut m);
        tr.inverse(&mut m);
        assert!(max_abs_diff(&original, &m) < 1e-9);
    }

    #[test]
    fn test_wpt_roundtrip_all_banks() {
        for w in BANKS {
            let tr = WaveletTransform::new(TransformType::Wpt, w);
            let original = test_matrix(8);
            let mut m = original.clone();
            tr.forward(&mut m);
            tr.inverse(&mut m);
            let diff = max_abs_diff(&original, &m);
            assert!(diff < 1e-9, "{} WPT roundtrip error {diff}", w.name());
        }
    }

    #[test]
    fn test_roundtrip_at_minimum_size() {
        for kind in [TransformType::Fwt, TransformType::Wpt] {
            let tr = WaveletTransform::new(kind, &SYMLET8);
            let original = test_matrix(2);
            let mut m = original.clone();
            tr.forward(&mut m);
            tr.inverse(&mut m);
            assert!(max_abs_diff(&original, &m) < 1e-9);
        }
    }

    #[test]
    fn test_constant_signal_compacts_into_dc() {
        let tr = WaveletTransform::new(TransformType::Fwt, &HAAR);
        let mut m = Matrix::new(8);
        for x in 0..8 {
            for y in 0..8 {
                m.set(x, y, 0.5);
            }
        }
        tr.forward(&mut m);
        // full cascade: all energy lands in the single DC cell
        assert!((m.get(0, 0) - 0.5 * 8.0).abs() < 1e-9);
        let rest: f64 = m
            .cells()
            .iter()
            .skip(1)
            .map(|v| v.abs())
            .fold(0.0, f64::max);
        assert!(rest < 1e-9);
    }

    #[test]
    fn test_fwt_and_wpt_differ() {
        let mut a = test_matrix(8);
        let mut b = a.clone();
        WaveletTransform::new(TransformType::Fwt, &HAAR).forward(&mut a);
        WaveletTransform::new(TransformType::Wpt, &HAAR).forward(&mut b);
        assert!(max_abs_diff(&a, &b) > 1e-6);
    }

    #[test]
    fn test_alias_table_is_frozen() {
        assert_eq!(Wavelet::for_type(WaveletType::Haar).name(), "Haar");
        assert_eq!(Wavelet::for_type(WaveletType::HaarOrthogonal).name(), "Haar");
        assert_eq!(
            Wavelet::for_type(WaveletType::Daubechies2).name(),
            "Daubechies2"
        );
        assert_eq!(
            Wavelet::for_type(WaveletType::Daubechies3).name(),
            "Daubechies4"
        );
        assert_eq!(Wavelet::for_type(WaveletType::Symlet3).name(), "Symlet4");
        assert_eq!(Wavelet::for_type(WaveletType::Symlet5).name(), "Symlet8");
        assert_eq!(Wavelet::for_type(WaveletType::Symlet10).name(), "Symlet8");
        assert_eq!(Wavelet::for_type(WaveletType::Coiflet1).name(), "Coiflet2");
        assert_eq!(Wavelet::for_type(WaveletType::Coiflet5).name(), "Coiflet2");
        // unmapped identities fall back to Haar
        assert_eq!(Wavelet::for_type(WaveletType::Daubechies7).name(), "Haar");
        assert_eq!(
            Wavelet::for_type(WaveletType::Biorthogonal44).name(),
            "Haar"
        );
        assert_eq!(Wavelet::for_type(WaveletType::Random).name(), "Haar");
    }

    #[test]
    fn test_orthonormality_of_stored_banks() {
        // each bank's low-pass taps sum to sqrt(2), high-pass to 0
        for w in BANKS.iter().chain([&&COIFLET2]) {
            let low_sum: f64 = w.lpd.iter().sum();
            let high_sum: f64 = w.hpd.iter().sum();
            assert!(
                (low_sum - std::f64::consts::SQRT_2).abs() < 1e-7,
                "{} low-pass sum {low_sum}",
                w.name()
            );
            assert!(high_sum.abs() < 1e-7, "{} high-pass sum {high_sum}", w.name());
        }
    }

    #[test]
    fn test_magnitude_compressor_zeroes_below_threshold() {
        let mut m = Matrix::new(2);
        m.set(0, 0, 0.05);
        m.set(1, 0, -0.05);
        m.set(0, 1, 0.2);
        m.set(1, 1, -0.2);
        MagnitudeCompressor::new(0.1).compress(&mut m);
        assert_eq!(m.get(0, 0), 0.0);
        assert_eq!(m.get(1, 0), 0.0);
        assert_eq!(m.get(0, 1), 0.2);
        assert_eq!(m.get(1, 1), -0.2);
    }
}
