use crate::util::is_valid_email;

/// Phase of the OTP-gated auth form.
///
/// `Idle -> OtpRequested -> OtpVerifying -> {Verified, Failed}`
///
/// A failed attempt is terminal: nothing retries on its own, the user must
/// explicitly re-trigger (resend or re-verify).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OtpPhase {
    Idle,
    OtpRequested,
    OtpVerifying,
    Verified,
    Failed,
}

/// Why a transition was refused. Blocked transitions never issue a
/// network call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OtpBlock {
    InvalidEmail,
    EmptyOtp,
    NotRequested,
    RequestInFlight,
}

impl OtpBlock {
    pub fn message(self) -> &'static str {
        match self {
            OtpBlock::InvalidEmail => "Please enter a valid email before sending OTP.",
            OtpBlock::EmptyOtp => "Enter the OTP first",
            OtpBlock::NotRequested => "Send an OTP to your email first",
            OtpBlock::RequestInFlight => "Request already in progress",
        }
    }
}

/// Per-form OTP state machine. Each form owns one; there is no
/// cross-form coordination. A single in-flight flag serializes the
/// form's own requests (send and verify share it, matching the one
/// network call per transition contract).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct OtpFlow {
    pub phase: OtpPhase,
    in_flight: bool,
}

impl OtpFlow {
    pub fn new() -> Self {
        Self {
            phase: OtpPhase::Idle,
            in_flight: false,
        }
    }

    pub fn sending(&self) -> bool {
        self.in_flight && self.phase != OtpPhase::OtpVerifying
    }

    pub fn verifying(&self) -> bool {
        self.in_flight && self.phase == OtpPhase::OtpVerifying
    }

    pub fn otp_sent(&self) -> bool {
        !matches!(self.phase, OtpPhase::Idle)
    }

    pub fn verified(&self) -> bool {
        self.phase == OtpPhase::Verified
    }

    /// Gate for "send OTP". Resend is allowed from any settled phase.
    pub fn begin_send(&mut self, email: &str) -> Result<(), OtpBlock> {
        if self.in_flight {
            return Err(OtpBlock::RequestInFlight);
        }
        if !is_valid_email(email) {
            return Err(OtpBlock::InvalidEmail);
        }
        self.in_flight = true;
        Ok(())
    }

    pub fn finish_send(&mut self, ok: bool) {
        self.in_flight = false;
        self.phase = if ok {
            OtpPhase::OtpRequested
        } else {
            OtpPhase::Idle
        };
    }

    /// Transport failure on "send OTP": settle the in-flight guard but keep
    /// the current phase, so an OTP from an earlier successful send stays
    /// enterable. Only a server-side rejection resets to `Idle`.
    pub fn abort_send(&mut self) {
        self.in_flight = false;
    }

    /// Gate for "verify OTP". Requires a requested (or previously failed)
    /// OTP and a non-empty code.
    pub fn begin_verify(&mut self, otp: &str) -> Result<(), OtpBlock> {
        if self.in_flight {
            return Err(OtpBlock::RequestInFlight);
        }
        if matches!(self.phase, OtpPhase::Idle) {
            return Err(OtpBlock::NotRequested);
        }
        if otp.trim().is_empty() {
            return Err(OtpBlock::EmptyOtp);
        }
        self.phase = OtpPhase::OtpVerifying;
        self.in_flight = true;
        Ok(())
    }

    pub fn finish_verify(&mut self, ok: bool) {
        self.in_flight = false;
        self.phase = if ok {
            OtpPhase::Verified
        } else {
            OtpPhase::Failed
        };
    }
}

impl Default for OtpFlow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_email_blocks_send() {
        let mut flow = OtpFlow::new();
        assert_eq!(flow.begin_send("not-an-email"), Err(OtpBlock::InvalidEmail));
        assert_eq!(flow.phase, OtpPhase::Idle);
        assert!(!flow.sending());
    }

    #[test]
    fn valid_email_starts_send_and_guards_duplicates() {
        let mut flow = OtpFlow::new();
        assert!(flow.begin_send("you@example.com").is_ok());
        assert!(flow.sending());

        // A second click while in flight is refused.
        assert_eq!(
            flow.begin_send("you@example.com"),
            Err(OtpBlock::RequestInFlight)
        );

        flow.finish_send(true);
        assert_eq!(flow.phase, OtpPhase::OtpRequested);
        assert!(flow.otp_sent());
    }

    #[test]
    fn failed_send_returns_to_idle() {
        let mut flow = OtpFlow::new();
        flow.begin_send("you@example.com").expect("gate passes");
        flow.finish_send(false);
        assert_eq!(flow.phase, OtpPhase::Idle);
        assert!(!flow.otp_sent());
    }

    #[test]
    fn empty_otp_blocks_verify() {
        let mut flow = OtpFlow::new();
        flow.begin_send("you@example.com").expect("gate passes");
        flow.finish_send(true);

        assert_eq!(flow.begin_verify(""), Err(OtpBlock::EmptyOtp));
        assert_eq!(flow.begin_verify("   "), Err(OtpBlock::EmptyOtp));
        assert_eq!(flow.phase, OtpPhase::OtpRequested);
    }

    #[test]
    fn verify_requires_a_requested_otp() {
        let mut flow = OtpFlow::new();
        assert_eq!(flow.begin_verify("123456"), Err(OtpBlock::NotRequested));
    }

    #[test]
    fn successful_verify_reaches_verified() {
        let mut flow = OtpFlow::new();
        flow.begin_send("you@example.com").expect("gate passes");
        flow.finish_send(true);

        assert!(flow.begin_verify("123456").is_ok());
        assert!(flow.verifying());

        flow.finish_verify(true);
        assert!(flow.verified());
    }

    #[test]
    fn failed_verify_is_terminal_until_retriggered() {
        let mut flow = OtpFlow::new();
        flow.begin_send("you@example.com").expect("gate passes");
        flow.finish_send(true);
        flow.begin_verify("000000").expect("gate passes");
        flow.finish_verify(false);

        assert_eq!(flow.phase, OtpPhase::Failed);
        assert!(!flow.verified());

        // Explicit re-trigger: verify again with a new code...
        assert!(flow.begin_verify("123456").is_ok());
        flow.finish_verify(true);
        assert!(flow.verified());
    }

    #[test]
    fn aborted_resend_keeps_the_otp_input_open() {
        let mut flow = OtpFlow::new();
        flow.begin_send("you@example.com").expect("gate passes");
        flow.finish_send(true);

        // Resend dies on the network; the earlier OTP is still usable.
        flow.begin_send("you@example.com").expect("gate passes");
        flow.abort_send();
        assert_eq!(flow.phase, OtpPhase::OtpRequested);
        assert!(flow.otp_sent());
        assert!(!flow.sending());

        assert!(flow.begin_verify("123456").is_ok());
    }

    #[test]
    fn resend_is_allowed_after_failure() {
        let mut flow = OtpFlow::new();
        flow.begin_send("you@example.com").expect("gate passes");
        flow.finish_send(true);
        flow.begin_verify("000000").expect("gate passes");
        flow.finish_verify(false);

        // ...or resend a fresh OTP.
        assert!(flow.begin_send("you@example.com").is_ok());
        flow.finish_send(true);
        assert_eq!(flow.phase, OtpPhase::OtpRequested);
    }
}
