use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ar,
    En,
}

impl FromStr for Locale {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ar" => Ok(Locale::Ar),
            "en" => Ok(Locale::En),
            other => anyhow::bail!("unsupported locale {other:?}"),
        }
    }
}

/// Every piece of copy the store can hand to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    NameTooShort,
    InvalidEmail,
    InvalidPhone,
    PasswordTooShort,
    PasswordMismatch,
    PasswordRequired,
    EmailTaken,
    InvalidCredentials,
    LoginRequired,
    UserNotFound,
    StorageFailure,
    RegisterSuccess,
    LoginSuccess,
    ComparisonAdded,
    ComparisonAlreadyListed,
    ComparisonRemoved,
    ComparisonFull { capacity: usize },
}

impl Message {
    pub fn render(self, locale: Locale) -> String {
        use Message::*;
        match (locale, self) {
            (Locale::Ar, NameTooShort) => "الاسم يجب أن يحتوي على حرفين على الأقل".into(),
            (Locale::Ar, InvalidEmail) => "البريد الإلكتروني غير صالح".into(),
            (Locale::Ar, InvalidPhone) => "رقم الهاتف يجب أن يحتوي على 10 أرقام".into(),
            (Locale::Ar, PasswordTooShort) => "كلمة المرور يجب أن تحتوي على 6 أحرف على الأقل".into(),
            (Locale::Ar, PasswordMismatch) => "كلمات المرور غير متطابقة".into(),
            (Locale::Ar, PasswordRequired) => "كلمة المرور مطلوبة".into(),
            (Locale::Ar, EmailTaken) => "البريد الإلكتروني مسجل بالفعل".into(),
            (Locale::Ar, InvalidCredentials) => "البريد الإلكتروني أو كلمة المرور غير صحيحة".into(),
            (Locale::Ar, LoginRequired) => "يجب تسجيل الدخول أولاً".into(),
            (Locale::Ar, UserNotFound) => "مستخدم غير موجود".into(),
            (Locale::Ar, StorageFailure) => "حدث خطأ أثناء حفظ البيانات".into(),
            (Locale::Ar, RegisterSuccess) => "تم إنشاء الحساب بنجاح".into(),
            (Locale::Ar, LoginSuccess) => "تم تسجيل الدخول بنجاح".into(),
            (Locale::Ar, ComparisonAdded) => "تمت إضافة المختبر إلى قائمة المقارنة".into(),
            (Locale::Ar, ComparisonAlreadyListed) => "المختبر موجود بالفعل في قائمة المقارنة".into(),
            (Locale::Ar, ComparisonRemoved) => "تمت إزالة المختبر من قائمة المقارنة".into(),
            (Locale::Ar, ComparisonFull { capacity }) => {
                format!("يمكنك مقارنة {capacity} مختبرات كحد أقصى")
            }

            (Locale::En, NameTooShort) => "Name must be at least 2 characters".into(),
            (Locale::En, InvalidEmail) => "Invalid email address".into(),
            (Locale::En, InvalidPhone) => "Phone number must contain 10 digits".into(),
            (Locale::En, PasswordTooShort) => "Password must be at least 6 characters".into(),
            (Locale::En, PasswordMismatch) => "Passwords do not match".into(),
            (Locale::En, PasswordRequired) => "Password is required".into(),
            (Locale::En, EmailTaken) => "Email already registered".into(),
            (Locale::En, InvalidCredentials) => "Invalid email or password".into(),
            (Locale::En, LoginRequired) => "You must log in first".into(),
            (Locale::En, UserNotFound) => "User not found".into(),
            (Locale::En, StorageFailure) => "Could not save your data".into(),
            (Locale::En, RegisterSuccess) => "Account created".into(),
            (Locale::En, LoginSuccess) => "Logged in".into(),
            (Locale::En, ComparisonAdded) => "Lab added to the comparison list".into(),
            (Locale::En, ComparisonAlreadyListed) => "Lab already in comparison list".into(),
            (Locale::En, ComparisonRemoved) => "Lab removed from the comparison list".into(),
            (Locale::En, ComparisonFull { capacity }) => {
                format!("You can compare at most {capacity} labs")
            }
        }
    }
}
