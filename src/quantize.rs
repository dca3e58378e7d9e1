// Popularity quantizer: builds a palette from the most used colors of an RGB
// image, grouping colors that agree in their top 5 bits per channel.
use hashbrown::HashMap;
use itertools::Itertools;

use crate::{color::ColorRGB, document::Image, palette::Palette};

#[derive(Default)]
struct Bucket {
    count: u64,
    sum: [u64; 3],
}

impl Bucket {
    fn average(&self) -> ColorRGB {
        let avg = |k: usize| ((self.sum[k] + self.count / 2) / self.count) as u8;
        [avg(0), avg(1), avg(2)]
    }
}

fn bucket_key(c: ColorRGB) -> u16 {
    ((c[0] as u16 >> 3) << 10) | ((c[1] as u16 >> 3) << 5) | (c[2] as u16 >> 3)
}

pub fn create_palette_from_rgb(image: &Image, size: usize) -> Palette {
    let mut buckets: HashMap<u16, Bucket> = HashMap::new();
    for px in image.rgb_pixels() {
        let bucket = buckets.entry(bucket_key(px)).or_default();
        bucket.count += 1;
        for k in 0..3 {
            bucket.sum[k] += px[k] as u64;
        }
    }

    let mut palette = Palette::new(size);
    let colors = buckets
        .iter()
        .sorted_by(|(ka, a), (kb, b)| b.count.cmp(&a.count).then(ka.cmp(kb)))
        .take(size)
        .map(|(_, bucket)| bucket.average());
    for (idx, color) in colors.enumerate() {
        palette.set(idx, color);
    }
    palette
}
