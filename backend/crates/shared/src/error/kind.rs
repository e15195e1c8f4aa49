//! Error classification shared by every bounded context

/// エラー分類
///
/// 各コンテキストのエラーは最終的にこのいずれかに落ち着き、
/// レスポンスのステータスとタイトルが決まる。
///
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// assert_eq!(ErrorKind::UnsupportedMediaType.status_code(), 415);
/// assert_eq!(ErrorKind::NotFound.as_str(), "Not Found");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    /// アップロードがサイズ上限を超えた
    PayloadTooLarge,
    /// 許可リストにない MIME タイプ
    UnsupportedMediaType,
    UnprocessableEntity,
    InternalServerError,
    /// オブジェクトストレージなど上流の失敗
    BadGateway,
    /// DB プールや Redis に届かない
    ServiceUnavailable,
}

impl ErrorKind {
    /// Status code and reason phrase, in that order
    const fn parts(self) -> (u16, &'static str) {
        match self {
            Self::BadRequest => (400, "Bad Request"),
            Self::Unauthorized => (401, "Unauthorized"),
            Self::Forbidden => (403, "Forbidden"),
            Self::NotFound => (404, "Not Found"),
            Self::Conflict => (409, "Conflict"),
            Self::PayloadTooLarge => (413, "Payload Too Large"),
            Self::UnsupportedMediaType => (415, "Unsupported Media Type"),
            Self::UnprocessableEntity => (422, "Unprocessable Entity"),
            Self::InternalServerError => (500, "Internal Server Error"),
            Self::BadGateway => (502, "Bad Gateway"),
            Self::ServiceUnavailable => (503, "Service Unavailable"),
        }
    }

    #[inline]
    pub const fn status_code(&self) -> u16 {
        self.parts().0
    }

    /// Reason phrase, used as the problem title
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.parts().1
    }

    /// 5xx は運用側の問題なのでログに残す
    #[inline]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// `type` member of a problem document
    pub fn problem_type(&self) -> String {
        format!("https://httpstatuses.io/{}", self.status_code())
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
