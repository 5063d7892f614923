//! Acquisition Session - 单次采集会话
//!
//! 付费墙状态属于会话，而不是进程级全局变量：
//! 每次采集以 `AcquisitionSession::start` 开始，门闩为打开状态。

/// 付费墙门闩
///
/// 一旦某个付费章节请求被拒绝即闭合，同一会话内后续付费章节
/// 不再发起网络请求
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaywallGate {
    locked: bool,
}

impl PaywallGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// 闭合门闩（会话内不可逆）
    pub fn trip(&mut self) {
        if !self.locked {
            tracing::info!("Paid chapters locked for the rest of the session");
        }
        self.locked = true;
    }

    pub fn reset(&mut self) {
        self.locked = false;
    }
}

/// 一个作品的采集会话
#[derive(Debug, Clone)]
pub struct AcquisitionSession {
    title_slug: String,
    gate: PaywallGate,
}

impl AcquisitionSession {
    /// 开始新会话，门闩为打开状态
    pub fn start(title_slug: impl Into<String>) -> Self {
        Self {
            title_slug: title_slug.into(),
            gate: PaywallGate::new(),
        }
    }

    pub fn title_slug(&self) -> &str {
        &self.title_slug
    }

    pub fn gate(&self) -> &PaywallGate {
        &self.gate
    }

    pub fn gate_mut(&mut self) -> &mut PaywallGate {
        &mut self.gate
    }

    /// 复用会话对象开始新的采集
    pub fn reset(&mut self, title_slug: impl Into<String>) {
        self.title_slug = title_slug.into();
        self.gate.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_starts_unlocked() {
        let session = AcquisitionSession::start("a");
        assert!(!session.gate().is_locked());
        assert_eq!(session.title_slug(), "a");
    }

    #[test]
    fn test_gate_stays_locked_until_reset() {
        let mut session = AcquisitionSession::start("a");
        session.gate_mut().trip();
        session.gate_mut().trip();
        assert!(session.gate().is_locked());

        session.reset("b");
        assert!(!session.gate().is_locked());
        assert_eq!(session.title_slug(), "b");
    }
}
