pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// Composite premultiplied RGBA8 `src` over an opaque straight-alpha background.
pub(crate) fn flatten_premul_px(src: [u8; 4], bg: [u8; 3]) -> [u8; 4] {
    let a = u16::from(src[3]);
    if a == 255 {
        return [src[0], src[1], src[2], 255];
    }
    let inv = 255 - a;
    let ch = |s: u8, b: u8| (u16::from(s) + mul_div255_u16(u16::from(b), inv)).min(255) as u8;
    [ch(src[0], bg[0]), ch(src[1], bg[1]), ch(src[2], bg[2]), 255]
}

/// Group decimal digits with commas, e.g. `8400 -> "8,400"`.
pub(crate) fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i).is_multiple_of(3) {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
