use std::fmt::Display;

/// Which copy a page variant is written in. Also decides the default
/// collection the entries go to, since the two audiences are tracked
/// separately.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    Korean,
    English,
}

/// Every user-facing string the widget can produce
#[derive(Debug, PartialEq, Eq)]
pub struct LocaleCopy {
    pub invalid_email: &'static str,
    pub consent_missing: &'static str,
    pub success: &'static str,
    /// Shown when the collector rejected the entry without saying why
    pub submit_failed: &'static str,
    pub network_error: &'static str,
    pub demo_coming_soon: &'static str,
    pub submit_idle: &'static str,
    pub submit_busy: &'static str,
    pub share_idle: &'static str,
    pub share_copied: &'static str,
}

static KOREAN: LocaleCopy = LocaleCopy {
    invalid_email: "올바른 이메일 주소를 입력해주세요.",
    consent_missing: "개인정보 수집 및 이용에 동의해주세요.",
    success: "얼리 액세스 신청이 완료되었습니다! 출시 소식을 이메일로 알려드리겠습니다.",
    submit_failed: "신청 중 오류가 발생했습니다. 다시 시도해주세요.",
    network_error: "네트워크 오류가 발생했습니다. 잠시 후 다시 시도해주세요.",
    demo_coming_soon: "데모 영상은 곧 공개됩니다!",
    submit_idle: "얼리 액세스 신청하기",
    submit_busy: "신청 중...",
    share_idle: "친구에게 공유하기",
    share_copied: "링크가 복사되었습니다!",
};

static ENGLISH: LocaleCopy = LocaleCopy {
    invalid_email: "Please enter a valid email address.",
    consent_missing: "Please agree to the collection and use of your personal information.",
    success: "You're on the list! We'll email you as soon as we launch.",
    submit_failed: "Something went wrong with your sign-up. Please try again.",
    network_error: "A network error occurred. Please try again in a moment.",
    demo_coming_soon: "The demo video is coming soon!",
    submit_idle: "Get early access",
    submit_busy: "Signing up...",
    share_idle: "Share with a friend",
    share_copied: "Link copied!",
};

impl Locale {
    pub fn copy(self) -> &'static LocaleCopy {
        match self {
            Locale::Korean => &KOREAN,
            Locale::English => &ENGLISH,
        }
    }

    /// Collection path used when the variant doesn't name one
    pub fn default_collection_path(self) -> &'static str {
        match self {
            Locale::Korean => "/rest/v1/waitlist",
            Locale::English => "/rest/v1/waitlist_en",
        }
    }
}

impl Display for Locale {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Locale::Korean => "ko",
                Locale::English => "en",
            }
        )
    }
}

impl TryFrom<String> for Locale {
    type Error = String;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "ko" | "kr" | "korean" => Ok(Self::Korean),
            "en" | "english" => Ok(Self::English),
            e => Err(format!("Unsupported locale: {e}")),
        }
    }
}
