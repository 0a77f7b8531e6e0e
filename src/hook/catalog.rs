use rand::Rng;

/// Fixed catalog of opening captions.
///
/// Grouped loosely by tone: curiosity, value, urgency, trend slang, questions.
pub static HOOKS: &[&str] = &[
    "KHOAN! DỪNG LẠI 2 GIÂY",
    "BÍ MẬT ĐỘNG TRỜI!",
    "CÁI NÀY HAY CỰC!",
    "KHÔNG XEM LÀ PHÍ",
    "THẬT KHÔNG THỂ TIN NỔI",
    "ĐỪNG LƯỚT QUA VỘI",
    "CÓ THỂ BẠN CHƯA BIẾT?",
    "XEM HẾT SẼ RÕ...",
    "ẢO MA CANADA!",
    "CHUYỆN TÂM LINH ĐẤY!",

    "SIÊU PHẨM 2024",
    "GIÁ RẺ GIẬT MÌNH",
    "XẢ KHO CỰC MẠNH",
    "DEAL HỜI THẾ KỶ",
    "CHỐT ĐƠN NGAY!",
    "HÀNG HIẾM CÓ KHÓ TÌM",
    "ĐẸP NHỨC NÁCH!",
    "XỊN XÒ CON BÒ CƯỜI",
    "ĐỈNH CỦA CHÓP!",
    "BEST SELLER LÀ ĐÂY",

    "CẢNH BÁO: QUÁ ĐẸP!",
    "CHỈ CÒN VÀI CÁI!",
    "SẮP CHÁY HÀNG RỒI",
    "CƠ HỘI CUỐI CÙNG",
    "NHANH TAY KẺO LỠ",
    "DUY NHẤT HÔM NAY",
    "SỐC: GIẢM CỰC SÂU",

    "10 ĐIỂM KHÔNG CÓ NHƯNG",
    "MÃI ĐỈNH LUÔN Á",
    "CỨU TUI CỨU TUI!",
    "KEO LÌ TÁI CHÂU",
    "OVER HỢP LUÔN",
    "HẾT NƯỚC CHẤM!",
    "U LÀ TRỜI ĐẸP XỈU",
    "GÉT GÔ CHỐT ĐƠN",
    "CHẤN ĐỘNG ĐỊA CẦU",

    "TẠI SAO LẠI HOT?",
    "TÌM ĐÂU RA GIÁ NÀY?",
    "BẠN ĐÃ CÓ CHƯA?",
    "TIN ĐƯỢC KHÔNG?",
    "AI RỒI CŨNG MÊ THÔI",
];

/// Pick one caption uniformly at random.
///
/// Called once per render; the result is held for every frame of that render.
pub fn pick_hook<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    HOOKS[rng.gen_range(0..HOOKS.len())]
}

/// Split a caption into at most two lines.
///
/// Captions with more than four words break at the midpoint word boundary; the first line gets
/// the extra word when the count is odd.
pub fn split_hook_lines(text: &str) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= 4 {
        return vec![words.join(" ")];
    }
    let mid = words.len().div_ceil(2);
    vec![words[..mid].join(" "), words[mid..].join(" ")]
}

#[cfg(test)]
#[path = "../../tests/unit/hook/catalog.rs"]
mod tests;
