//! 结构相似度（SSIM）
//!
//! 灰度图像的均匀窗口 SSIM：7x7 窗口、数据范围 255、样本协方差，
//! 结果取所有完整窗口的平均值。

use image::GrayImage;
use thiserror::Error;

/// 窗口边长
pub const WINDOW_SIZE: u32 = 7;

const K1: f64 = 0.01;
const K2: f64 = 0.03;
const DATA_RANGE: f64 = 255.0;

#[derive(Debug, Error, PartialEq)]
pub enum SimilarityError {
    #[error("Image dimensions differ: {0:?} vs {1:?}")]
    DimensionMismatch((u32, u32), (u32, u32)),

    #[error("Image too small for SSIM window: {0}x{1}")]
    TooSmall(u32, u32),
}

/// 计算两张同尺寸灰度图的 SSIM，取值约在 [-1, 1]
pub fn structural_similarity(a: &GrayImage, b: &GrayImage) -> Result<f64, SimilarityError> {
    if a.dimensions() != b.dimensions() {
        return Err(SimilarityError::DimensionMismatch(a.dimensions(), b.dimensions()));
    }

    let (width, height) = a.dimensions();
    if width < WINDOW_SIZE || height < WINDOW_SIZE {
        return Err(SimilarityError::TooSmall(width, height));
    }

    let sums = IntegralImages::new(a, b);
    let n = f64::from(WINDOW_SIZE * WINDOW_SIZE);
    let cov_norm = n / (n - 1.0);
    let c1 = (K1 * DATA_RANGE).powi(2);
    let c2 = (K2 * DATA_RANGE).powi(2);

    let mut total = 0.0;
    let mut windows = 0u64;

    for y in 0..=(height - WINDOW_SIZE) {
        for x in 0..=(width - WINDOW_SIZE) {
            let [sa, sb, saa, sbb, sab] = sums.window(x, y, WINDOW_SIZE);

            let mean_a = sa / n;
            let mean_b = sb / n;
            let var_a = cov_norm * (saa / n - mean_a * mean_a);
            let var_b = cov_norm * (sbb / n - mean_b * mean_b);
            let cov_ab = cov_norm * (sab / n - mean_a * mean_b);

            let numerator = (2.0 * mean_a * mean_b + c1) * (2.0 * cov_ab + c2);
            let denominator =
                (mean_a * mean_a + mean_b * mean_b + c1) * (var_a + var_b + c2);

            total += numerator / denominator;
            windows += 1;
        }
    }

    Ok(total / windows as f64)
}

/// 差异百分比：`100 - ssim * 100`
pub fn difference_percent(a: &GrayImage, b: &GrayImage) -> Result<f64, SimilarityError> {
    structural_similarity(a, b).map(|ssim| 100.0 - ssim * 100.0)
}

/// 五张积分图：a, b, a², b², ab
struct IntegralImages {
    stride: usize,
    tables: [Vec<f64>; 5],
}

impl IntegralImages {
    fn new(a: &GrayImage, b: &GrayImage) -> Self {
        let (width, height) = a.dimensions();
        let stride = width as usize + 1;
        let size = stride * (height as usize + 1);
        let mut tables: [Vec<f64>; 5] = std::array::from_fn(|_| vec![0.0; size]);

        for y in 0..height {
            let mut row = [0.0f64; 5];
            for x in 0..width {
                let pa = f64::from(a.get_pixel(x, y)[0]);
                let pb = f64::from(b.get_pixel(x, y)[0]);
                let values = [pa, pb, pa * pa, pb * pb, pa * pb];

                let idx = (y as usize + 1) * stride + x as usize + 1;
                let above = y as usize * stride + x as usize + 1;
                for (k, table) in tables.iter_mut().enumerate() {
                    row[k] += values[k];
                    table[idx] = table[above] + row[k];
                }
            }
        }

        Self { stride, tables }
    }

    fn window(&self, x: u32, y: u32, size: u32) -> [f64; 5] {
        let (x0, y0) = (x as usize, y as usize);
        let (x1, y1) = (x0 + size as usize, y0 + size as usize);
        let s = self.stride;

        std::array::from_fn(|k| {
            let t = &self.tables[k];
            t[y1 * s + x1] - t[y0 * s + x1] - t[y1 * s + x0] + t[y0 * s + x0]
        })
    }
}
