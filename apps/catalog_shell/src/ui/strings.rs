//! Localized UI text.

use chrono::{Datelike, NaiveDate};
use shared::domain::Locale;

#[derive(Debug, Clone)]
pub struct Strings {
    pub locale: Locale,
    pub login_success: &'static str,
    pub login_missing_fields: &'static str,
    pub profile_saved: &'static str,
    pub renew_prompt: &'static str,
    pub renew_success: &'static str,
    pub return_prompt: &'static str,
    pub return_success: &'static str,
    pub avatar_updated: &'static str,
    pub avatar_failed: &'static str,
    pub storage_failed: &'static str,
    pub empty_title: &'static str,
    pub empty_hint: &'static str,
    pub due_prefix: &'static str,
    pub read_label: &'static str,
    pub renew_label: &'static str,
    pub unspecified: &'static str,
}

impl Strings {
    pub fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::Arabic => Self {
                locale,
                login_success: "تم تسجيل الدخول بنجاح!",
                login_missing_fields: "يرجى إدخال اسم المستخدم وكلمة المرور",
                profile_saved: "تم حفظ البيانات بنجاح!",
                renew_prompt: "هل تريد تجديد هذا الكتاب؟",
                renew_success: "تم تجديد الكتاب بنجاح!",
                return_prompt: "هل تريد إرجاع هذا الكتاب؟",
                return_success: "تم إرجاع الكتاب بنجاح!",
                avatar_updated: "تم تحديث الصورة الشخصية!",
                avatar_failed: "تعذرت قراءة الصورة المختارة",
                storage_failed: "تعذر حفظ البيانات، حاول مرة أخرى",
                empty_title: "لا توجد كتب في هذا التصنيف",
                empty_hint: "جرب تصنيف آخر أو استعر بعض الكتب",
                due_prefix: "مستحق:",
                read_label: "قراءة",
                renew_label: "تجديد",
                unspecified: "غير محدد",
            },
            Locale::English => Self {
                locale,
                login_success: "Signed in successfully!",
                login_missing_fields: "Please enter a username and password",
                profile_saved: "Profile saved successfully!",
                renew_prompt: "Renew this book?",
                renew_success: "Book renewed successfully!",
                return_prompt: "Return this book?",
                return_success: "Book returned successfully!",
                avatar_updated: "Profile picture updated!",
                avatar_failed: "Could not read the selected image",
                storage_failed: "Could not save your data; please retry",
                empty_title: "No books in this category",
                empty_hint: "Try another category or borrow some books",
                due_prefix: "Due:",
                read_label: "Read",
                renew_label: "Renew",
                unspecified: "Unspecified",
            },
        }
    }

    pub fn format_date(&self, date: NaiveDate) -> String {
        match self.locale {
            Locale::Arabic => arabic_indic_digits(&format!(
                "{}/{}/{}",
                date.day(),
                date.month(),
                date.year()
            )),
            Locale::English => date.format("%b %-d, %Y").to_string(),
        }
    }

    pub fn due_label(&self, date: NaiveDate) -> String {
        format!("{} {}", self.due_prefix, self.format_date(date))
    }
}

fn arabic_indic_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c.to_digit(10) {
            Some(d) => char::from_u32(0x0660 + d).unwrap_or(c),
            None => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("date")
    }

    #[test]
    fn arabic_dates_use_arabic_indic_digits() {
        let strings = Strings::for_locale(Locale::Arabic);
        assert_eq!(strings.format_date(date(2024, 12, 15)), "١٥/١٢/٢٠٢٤");
        assert_eq!(strings.due_label(date(2025, 1, 8)), "مستحق: ٨/١/٢٠٢٥");
    }

    #[test]
    fn english_dates_are_month_first() {
        let strings = Strings::for_locale(Locale::English);
        assert_eq!(strings.due_label(date(2024, 12, 29)), "Due: Dec 29, 2024");
    }
}
