/// A decoded RGBA image, 8 bits per channel, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Raster {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize * 4);

        Self {
            width,
            height,
            pixels,
        }
    }

    /// Single-color image, mostly useful for tests and the undefined glyph
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = rgba
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();

        Self::new(width, height, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Decode stored PNG bytes, converting grayscale/RGB/indexed inputs
    /// to RGBA
    pub fn decode_png(bytes: &[u8]) -> anyhow::Result<Self> {
        let mut decoder = png::Decoder::new(bytes);
        decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);

        let mut reader = decoder.read_info()?;
        let mut buffer = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buffer)?;
        buffer.truncate(info.buffer_size());

        let pixels = match info.color_type {
            png::ColorType::Rgba => buffer,
            png::ColorType::Rgb => buffer
                .chunks_exact(3)
                .flat_map(|px| [px[0], px[1], px[2], 0xFF])
                .collect(),
            png::ColorType::GrayscaleAlpha => buffer
                .chunks_exact(2)
                .flat_map(|px| [px[0], px[0], px[0], px[1]])
                .collect(),
            png::ColorType::Grayscale => {
                buffer.iter().flat_map(|&g| [g, g, g, 0xFF]).collect()
            }
            // EXPAND turns indexed images into RGB(A) before we see them
            png::ColorType::Indexed => {
                anyhow::bail!("indexed png not expanded by decoder")
            }
        };

        Ok(Self::new(info.width, info.height, pixels))
    }

    /// Re-encode as a lossless RGBA-8 PNG for embedding in font tables
    pub fn encode_png(&self) -> anyhow::Result<Vec<u8>> {
        let mut out = Vec::new();

        let mut encoder = png::Encoder::new(&mut out, self.width, self.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(&self.pixels)?;
        writer.finish()?;

        Ok(out)
    }

    /// Area-averaging resample to exactly `width` x `height`.
    ///
    /// Each destination pixel is the weighted mean of the source pixels its
    /// box covers, with fractional coverage at the edges. Works in both
    /// directions, though captures are almost always downsampled.
    pub fn resample(&self, width: u32, height: u32) -> Self {
        if width == self.width && height == self.height {
            return self.clone();
        }

        let x_scale = f64::from(self.width) / f64::from(width);
        let y_scale = f64::from(self.height) / f64::from(height);

        let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);

        for dst_y in 0..height {
            let y0 = f64::from(dst_y) * y_scale;
            let y1 = y0 + y_scale;

            for dst_x in 0..width {
                let x0 = f64::from(dst_x) * x_scale;
                let x1 = x0 + x_scale;

                pixels.extend_from_slice(&self.average_box(x0, x1, y0, y1));
            }
        }

        Self::new(width, height, pixels)
    }

    fn average_box(&self, x0: f64, x1: f64, y0: f64, y1: f64) -> [u8; 4] {
        let mut sum = [0.0_f64; 4];
        let mut total_weight = 0.0_f64;

        let row_start = y0.floor() as u32;
        let row_end = (y1.ceil() as u32).min(self.height);
        let col_start = x0.floor() as u32;
        let col_end = (x1.ceil() as u32).min(self.width);

        for src_y in row_start..row_end {
            let y_weight = overlap(src_y, y0, y1);
            if y_weight == 0.0 {
                continue;
            }

            for src_x in col_start..col_end {
                let weight = overlap(src_x, x0, x1) * y_weight;
                if weight == 0.0 {
                    continue;
                }

                let idx = (src_y as usize * self.width as usize + src_x as usize) * 4;
                for channel in 0..4 {
                    sum[channel] += f64::from(self.pixels[idx + channel]) * weight;
                }
                total_weight += weight;
            }
        }

        let mut out = [0; 4];
        if total_weight > 0.0 {
            for channel in 0..4 {
                out[channel] = (sum[channel] / total_weight).round().clamp(0.0, 255.0) as u8;
            }
        }

        out
    }
}

/// Length of the intersection of the unit interval `[cell, cell + 1]` with
/// `[lo, hi]`
fn overlap(cell: u32, lo: f64, hi: f64) -> f64 {
    let start = f64::from(cell).max(lo);
    let end = f64::from(cell + 1).min(hi);

    (end - start).max(0.0)
}
