//! # Identity Module
//!
//! Kiểm tra tên chủ tài khoản và giấy tờ tùy thân khi mở tài khoản.
//!
//! Có hai bộ kiểm tra, chọn bằng config:
//! - [`StrictVerifier`]: đúng format từng loại giấy tờ (Aadhaar, PAN, ...)
//! - [`LenientVerifier`]: chỉ cần chuỗi chữ/số hợp lý, không phân biệt loại

use serde::{Deserialize, Serialize};
use std::fmt;

/// Loại giấy tờ tùy thân
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdType {
    Aadhaar,
    Pan,
    Passport,
    VoterId,
    DrivingLicense,
}

impl IdType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdType::Aadhaar => "aadhaar",
            IdType::Pan => "pan",
            IdType::Passport => "passport",
            IdType::VoterId => "voter_id",
            IdType::DrivingLicense => "driving_license",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "aadhaar" => Some(IdType::Aadhaar),
            "pan" => Some(IdType::Pan),
            "passport" => Some(IdType::Passport),
            "voter_id" | "voter" => Some(IdType::VoterId),
            "driving_license" | "dl" => Some(IdType::DrivingLicense),
            _ => None,
        }
    }

    /// Tất cả loại giấy tờ, theo thứ tự hiển thị trong menu
    pub fn all_types() -> [IdType; 5] {
        [
            IdType::Aadhaar,
            IdType::Pan,
            IdType::Passport,
            IdType::VoterId,
            IdType::DrivingLicense,
        ]
    }
}

impl fmt::Display for IdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Giấy tờ tùy thân: loại + số
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdDocument {
    pub id_type: IdType,
    pub number: String,
}

impl IdDocument {
    pub fn new(id_type: IdType, number: &str) -> Self {
        Self {
            id_type,
            number: number.to_string(),
        }
    }
}

/// Bộ kiểm tra danh tính
pub trait IdentityVerifier: Send + Sync {
    /// Tên hợp lệ: không rỗng, chỉ chữ cái và khoảng trắng
    fn verify_name(&self, name: &str) -> bool {
        !name.is_empty() && name.chars().all(|c| c.is_ascii_alphabetic() || c == ' ')
    }

    /// Kiểm tra số giấy tờ theo loại
    fn verify_document(&self, document: &IdDocument) -> bool;
}

/// Tag chọn bộ kiểm tra trong config
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerifierKind {
    #[default]
    Strict,
    Lenient,
}

impl VerifierKind {
    /// Tạo verifier tương ứng với tag
    pub fn build(self) -> Box<dyn IdentityVerifier> {
        match self {
            VerifierKind::Strict => Box::new(StrictVerifier),
            VerifierKind::Lenient => Box::new(LenientVerifier),
        }
    }
}

/// Kiểm tra đúng format của từng loại giấy tờ
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictVerifier;

impl StrictVerifier {
    fn aadhaar(n: &str) -> bool {
        n.len() == 12 && n.bytes().all(|b| b.is_ascii_digit())
    }

    /// PAN: 5 chữ hoa, 4 chữ số, 1 chữ hoa (e.g. ABCDE1234F)
    fn pan(n: &str) -> bool {
        let b = n.as_bytes();
        b.len() == 10
            && b[..5].iter().all(u8::is_ascii_uppercase)
            && b[5..9].iter().all(u8::is_ascii_digit)
            && b[9].is_ascii_uppercase()
    }
}

impl IdentityVerifier for StrictVerifier {
    fn verify_document(&self, document: &IdDocument) -> bool {
        let n = document.number.as_str();
        match document.id_type {
            IdType::Aadhaar => Self::aadhaar(n),
            IdType::Pan => Self::pan(n),
            IdType::Passport => (8..=9).contains(&n.len()),
            IdType::VoterId => n.len() == 10,
            IdType::DrivingLicense => (10..=16).contains(&n.len()),
        }
    }
}

/// Chỉ yêu cầu 4-20 ký tự chữ/số ASCII, áp dụng cho mọi loại
#[derive(Debug, Clone, Copy, Default)]
pub struct LenientVerifier;

impl IdentityVerifier for LenientVerifier {
    fn verify_name(&self, name: &str) -> bool {
        let trimmed = name.trim();
        !trimmed.is_empty() && trimmed.chars().all(|c| c.is_alphabetic() || c == ' ' || c == '.')
    }

    fn verify_document(&self, document: &IdDocument) -> bool {
        let n = document.number.as_str();
        (4..=20).contains(&n.len()) && n.bytes().all(|b| b.is_ascii_alphanumeric())
    }
}
