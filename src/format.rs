//! 表示用の数値フォーマット（pt-BR: 桁区切り "." / 小数点 ","）

/// 金額（小数2桁固定）: 1234.5 → "1.234,50"
pub fn format_currency(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}{},{:02}", sign, group_thousands(cents / 100), cents % 100)
}

/// 販売額: 端数がなければ小数なし（"1.200"）、あれば2桁
pub fn format_sale_value(value: f64) -> String {
    if value.fract() == 0.0 {
        let sign = if value < 0.0 { "-" } else { "" };
        format!("{}{}", sign, group_thousands(value.abs() as u64))
    } else {
        format_currency(value)
    }
}

/// 端数コード: 0.97 → "0,97"
pub fn format_fraction(fraction: f64) -> String {
    format!("{:.2}", fraction).replace('.', ",")
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}
