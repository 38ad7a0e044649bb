//! TED colour palette.
//!
//! A colour index is `luminance << 4 | hue` (7 bits). The table maps each
//! index to sRGB; presentation code expands scanlines through it.

/// RGB triple for every 7-bit colour index.
pub const PALETTE: [[u8; 3]; 128] = [
    [0, 0, 0], [44, 44, 44], [98, 19, 7], [0, 66, 67], // 0x00
    [81, 3, 120], [0, 78, 0], [39, 24, 142], [48, 62, 0], // 0x04
    [88, 33, 0], [70, 48, 0], [36, 68, 0], [99, 4, 72], // 0x08
    [0, 78, 12], [14, 39, 132], [51, 17, 142], [24, 72, 0], // 0x0c
    [0, 0, 0], [59, 59, 59], [112, 36, 25], [0, 80, 90], // 0x10
    [96, 22, 133], [18, 93, 0], [54, 40, 155], [63, 76, 0], // 0x14
    [102, 49, 0], [85, 63, 0], [52, 82, 0], [113, 22, 86], // 0x18
    [0, 92, 29], [31, 54, 145], [66, 34, 155], [40, 87, 0], // 0x1c
    [0, 0, 0], [66, 66, 66], [119, 44, 33], [5, 88, 97], // 0x20
    [102, 30, 140], [27, 100, 0], [62, 48, 162], [71, 84, 0], // 0x24
    [109, 57, 0], [92, 71, 0], [59, 89, 0], [119, 31, 93], // 0x28
    [4, 99, 37], [39, 62, 152], [73, 42, 161], [48, 94, 0], // 0x2c
    [0, 0, 0], [81, 81, 81], [132, 59, 49], [23, 101, 111], // 0x30
    [116, 46, 153], [43, 113, 0], [76, 63, 175], [85, 98, 0], // 0x34
    [122, 71, 9], [106, 85, 0], [74, 103, 0], [133, 47, 107], // 0x38
    [23, 113, 53], [54, 76, 165], [87, 57, 174], [63, 107, 0], // 0x3c
    [0, 0, 0], [122, 122, 122], [172, 102, 92], [70, 142, 151], // 0x40
    [156, 90, 192], [87, 153, 46], [118, 106, 213], [126, 138, 19], // 0x44
    [162, 113, 58], [146, 126, 32], [116, 143, 20], [172, 90, 147], // 0x48
    [69, 153, 96], [98, 118, 203], [128, 100, 212], [106, 148, 25], // 0x4c
    [0, 0, 0], [149, 149, 149], [197, 129, 120], [98, 168, 177], // 0x50
    [182, 117, 217], [115, 179, 76], [145, 133, 237], [153, 164, 51], // 0x54
    [187, 140, 87], [172, 153, 62], [143, 170, 52], [198, 118, 173], // 0x58
    [98, 179, 123], [125, 145, 228], [155, 128, 237], [133, 174, 56], // 0x5c
    [0, 0, 0], [175, 175, 175], [222, 155, 147], [125, 194, 202], // 0x60
    [207, 144, 242], [141, 205, 104], [171, 159, 255], [179, 190, 81], // 0x64
    [213, 166, 115], [198, 179, 91], [169, 195, 81], [223, 145, 199], // 0x68
    [125, 204, 150], [151, 171, 253], [181, 154, 255], [159, 199, 85], // 0x6c
    [0, 0, 0], [225, 225, 225], [255, 207, 198], [178, 244, 252], // 0x70
    [255, 196, 255], [193, 154, 157], [221, 210, 255], [229, 240, 136], // 0x74
    [255, 217, 168], [247, 229, 145], [219, 245, 136], [255, 196, 249], // 0x78
    [177, 254, 201], [203, 221, 225], [231, 205, 255], [210, 249, 140], // 0x7c
];

/// RGB for a colour index; bit 7 is ignored.
#[inline]
pub fn rgb(index: u8) -> [u8; 3] {
    PALETTE[(index & 0x7F) as usize]
}

/// RGBA with full alpha, the layout `pixels` and `image` expect.
#[inline]
pub fn rgba(index: u8) -> [u8; 4] {
    let [r, g, b] = rgb(index);
    [r, g, b, 0xFF]
}
