// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持英文（默认）和中文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 默认语言
pub const DEFAULT_LOCALE: &str = "en";

/// 支持的语言
pub const SUPPORTED_LOCALES: [&str; 2] = ["en", "zh-CN"];

/// 规范化语言代码（未知语言回退到默认语言）
///
/// 接受 "zh" / "zh_CN" / "zh-cn" 等写法
pub fn normalize_locale(locale: &str) -> &'static str {
    let lowered = locale.trim().to_lowercase().replace('_', "-");
    if lowered.starts_with("zh") {
        "zh-CN"
    } else {
        DEFAULT_LOCALE
    }
}

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"en" 或 "zh-CN"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(normalize_locale(locale));
}

/// 翻译消息（无参数，使用当前语言）
///
/// # 示例
/// ```no_run
/// use steelworks_defect::i18n::t;
/// let msg = t("common.success");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（指定语言，带参数）
///
/// # 示例
/// ```no_run
/// use steelworks_defect::i18n::t_in;
/// let msg = t_in("en", "report.drilldown_title", &[("code", "WELD")]);
/// ```
pub fn t_in(locale: &str, key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key, locale = normalize_locale(locale)).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // rust-i18n 的 locale 为全局状态，且 Rust 测试默认并行执行；
    // 为避免测试互相干扰，这里对 i18n 相关测试串行化。
    static LOCALE_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_normalize_locale() {
        assert_eq!(normalize_locale("zh"), "zh-CN");
        assert_eq!(normalize_locale("zh_CN"), "zh-CN");
        assert_eq!(normalize_locale("EN"), "en");
        assert_eq!(normalize_locale("fr"), "en");
    }

    #[test]
    fn test_set_locale() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("zh-CN");
        assert_eq!(current_locale(), "zh-CN");
        assert_eq!(t("common.success"), "操作成功");

        set_locale("en");
        assert_eq!(current_locale(), "en");
        assert_eq!(t("common.success"), "Operation successful");
    }

    #[test]
    fn test_translate_in_locale_with_args() {
        let msg = t_in("en", "import.file_not_found", &[("path", "/tmp/events.csv")]);
        assert!(msg.contains("/tmp/events.csv"));
        assert!(msg.contains("File not found"));

        let msg = t_in("zh-CN", "import.file_not_found", &[("path", "/tmp/events.csv")]);
        assert!(msg.contains("文件不存在"));
    }
}
