//! # OTP Module
//!
//! One-time password 4 chữ số cho step-up authentication.
//!
//! Mỗi bước nhạy cảm (mở tài khoản, đăng nhập, quên password) phát hành một
//! challenge mới. Challenge chỉ được so sánh đúng một lần rồi bị hủy, dù đúng
//! hay sai. Không có kênh gửi thật: mã được giao cho một [`OtpChannel`].

use rand::Rng;
use std::ops::RangeInclusive;

/// Khoảng giá trị của mã OTP
pub const OTP_RANGE: RangeInclusive<u16> = 1000..=9999;

/// Kênh giao mã OTP và nhận lại mã người dùng nhập.
///
/// Console, SMS giả lập hay test double đều implement trait này.
pub trait OtpChannel {
    /// Giao mã vừa sinh cho người dùng (hiển thị, gửi SMS, ...)
    fn deliver(&mut self, code: u16);

    /// Mã người dùng nhập lại. `None` nghĩa là không đọc được, tính là sai.
    fn response(&mut self) -> Option<u16>;
}

/// Một challenge OTP đang chờ xác minh
#[derive(Debug)]
pub struct OtpChallenge {
    code: u16,
}

impl OtpChallenge {
    /// Sinh challenge mới từ random source
    pub fn issue<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            code: rng.gen_range(OTP_RANGE),
        }
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    /// So sánh với mã nhập vào. Consume challenge nên không thể thử lại.
    pub fn verify(self, entered: u16) -> bool {
        self.code == entered
    }
}

/// Phát hành challenge, giao qua channel, so sánh với response.
pub fn issue_and_verify(channel: &mut dyn OtpChannel) -> bool {
    issue_and_verify_with(&mut rand::thread_rng(), channel)
}

/// Như [`issue_and_verify`] nhưng với random source chỉ định.
pub fn issue_and_verify_with<R: Rng + ?Sized>(rng: &mut R, channel: &mut dyn OtpChannel) -> bool {
    let challenge = OtpChallenge::issue(rng);
    channel.deliver(challenge.code());

    let passed = match channel.response() {
        Some(entered) => challenge.verify(entered),
        None => false,
    };

    if !passed {
        tracing::warn!("OTP verification failed");
    }
    passed
}

/// Channel trả lại đúng mã vừa nhận, mô phỏng người dùng đọc SMS.
#[derive(Debug, Default)]
pub struct EchoChannel {
    delivered: Vec<u16>,
}

impl EchoChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Các mã đã được giao, theo thứ tự
    pub fn delivered(&self) -> &[u16] {
        &self.delivered
    }
}

impl OtpChannel for EchoChannel {
    fn deliver(&mut self, code: u16) {
        self.delivered.push(code);
    }

    fn response(&mut self) -> Option<u16> {
        self.delivered.last().copied()
    }
}

/// Channel luôn trả lời cùng một giá trị, bất kể mã được giao.
#[derive(Debug, Clone, Copy)]
pub struct FixedChannel(pub Option<u16>);

impl OtpChannel for FixedChannel {
    fn deliver(&mut self, _code: u16) {}

    fn response(&mut self) -> Option<u16> {
        self.0
    }
}
