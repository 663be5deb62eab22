use std::collections::HashMap;

pub struct I18n {
    translations: HashMap<String, HashMap<String, String>>,
    current_lang: String,
}

impl I18n {
    pub fn new(lang: &str) -> Self {
        let mut translations = HashMap::new();

        // English
        let mut en = HashMap::new();
        en.insert("label_success".to_string(), "Success".to_string());
        en.insert("label_warning".to_string(), "Warning".to_string());
        en.insert("label_error".to_string(), "Error".to_string());

        // Outcomes
        en.insert("success_installed".to_string(), "Language installed.".to_string());
        en.insert("success_activated".to_string(), "Language activated.".to_string());
        en.insert("success_uninstalled".to_string(), "Language uninstalled.".to_string());
        en.insert("warning_already_installed".to_string(), "Language already installed.".to_string());

        // Error messages
        en.insert("error_not_installed".to_string(), "Language not installed.".to_string());
        en.insert("error_install_failed".to_string(), "Couldn't install language.".to_string());
        en.insert("error_no_files".to_string(), "No files found in language directory.".to_string());
        en.insert("error_uninstall_failed".to_string(), "Couldn't uninstall language.".to_string());
        en.insert("error_load_config".to_string(), "Failed to load configuration".to_string());
        en.insert("error_context".to_string(), "{0}: {1}".to_string());

        // Chinese
        let mut zh = HashMap::new();
        zh.insert("label_success".to_string(), "成功".to_string());
        zh.insert("label_warning".to_string(), "警告".to_string());
        zh.insert("label_error".to_string(), "错误".to_string());

        zh.insert("success_installed".to_string(), "语言包已安装。".to_string());
        zh.insert("success_activated".to_string(), "语言已启用。".to_string());
        zh.insert("success_uninstalled".to_string(), "语言包已卸载。".to_string());
        zh.insert("warning_already_installed".to_string(), "语言包已经安装。".to_string());

        zh.insert("error_not_installed".to_string(), "语言包未安装。".to_string());
        zh.insert("error_install_failed".to_string(), "无法安装语言包。".to_string());
        zh.insert("error_no_files".to_string(), "语言目录中没有找到文件。".to_string());
        zh.insert("error_uninstall_failed".to_string(), "无法卸载语言包。".to_string());
        zh.insert("error_load_config".to_string(), "加载配置失败".to_string());
        zh.insert("error_context".to_string(), "{0}：{1}".to_string());

        translations.insert("en".to_string(), en);
        translations.insert("zh".to_string(), zh);

        let effective_lang = if lang.starts_with("zh") || lang == "cn" || lang == "chinese" {
            "zh"
        } else {
            "en"
        };

        Self {
            translations,
            current_lang: effective_lang.to_string(),
        }
    }

    pub fn t(&self, key: &str) -> String {
        if let Some(lang_map) = self.translations.get(&self.current_lang) {
            if let Some(value) = lang_map.get(key) {
                return value.clone();
            }
        }
        key.to_string()
    }

    pub fn t_format(&self, key: &str, args: &[&str]) -> String {
        let template = self.t(key);
        let mut result = template;
        for (i, arg) in args.iter().enumerate() {
            result = result.replace(&format!("{{{}}}", i), arg);
        }
        result
    }
}
