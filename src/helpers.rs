use crate::common::ColorArgb;

fn premultiply(c: u8, alpha: u8) -> u8 {
    ((c as u16 * alpha as u16 + 127) / 255) as u8
}

pub fn argb_from_rgba(rgba: [u8; 4]) -> ColorArgb {
    let [r, g, b, a] = rgba;
    let (r, g, b) = (premultiply(r, a), premultiply(g, a), premultiply(b, a));
    (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

pub fn rgba_from_argb(argb: ColorArgb) -> [u8; 4] {
    let [a, r, g, b] = argb.to_be_bytes();
    [r, g, b, a]
}
