//! Line-discipline attributes
//!
//! Typed views over the `termios` record. The record itself is kept whole so
//! that a captured snapshot can be re-applied bit-for-bit, including control
//! characters and line speeds the flag views never touch.

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Input processing flags (`c_iflag`)
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct InputFlags: libc::tcflag_t {
        const BRKINT = libc::BRKINT;
        const ICRNL  = libc::ICRNL;
        const INPCK  = libc::INPCK;
        const ISTRIP = libc::ISTRIP;
        const IXON   = libc::IXON;

        const _ = !0;
    }
}

bitflags! {
    /// Output processing flags (`c_oflag`)
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct OutputFlags: libc::tcflag_t {
        const OPOST = libc::OPOST;

        const _ = !0;
    }
}

bitflags! {
    /// Control flags (`c_cflag`)
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ControlFlags: libc::tcflag_t {
        const CS8 = libc::CS8;

        const _ = !0;
    }
}

bitflags! {
    /// Local mode flags (`c_lflag`)
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct LocalFlags: libc::tcflag_t {
        const ECHO   = libc::ECHO;
        const ICANON = libc::ICANON;
        const IEXTEN = libc::IEXTEN;
        const ISIG   = libc::ISIG;

        const _ = !0;
    }
}

/// A complete set of terminal attributes
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Attributes(libc::termios);

impl Default for Attributes {
    fn default() -> Self {
        // SAFETY: termios is a plain C struct of integers and arrays; all-zero is valid.
        Self(unsafe { std::mem::zeroed() })
    }
}

impl fmt::Debug for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attributes")
            .field("input", &self.input_flags())
            .field("output", &self.output_flags())
            .field("control", &self.control_flags())
            .field("local", &self.local_flags())
            .field("vmin", &self.min_bytes())
            .field("vtime", &self.read_timeout())
            .finish()
    }
}

impl From<libc::termios> for Attributes {
    fn from(termios: libc::termios) -> Self {
        Self(termios)
    }
}

impl Attributes {
    pub fn as_termios(&self) -> &libc::termios {
        &self.0
    }

    pub fn input_flags(&self) -> InputFlags {
        InputFlags::from_bits_retain(self.0.c_iflag)
    }

    pub fn set_input_flags(&mut self, flags: InputFlags) {
        self.0.c_iflag = flags.bits();
    }

    pub fn output_flags(&self) -> OutputFlags {
        OutputFlags::from_bits_retain(self.0.c_oflag)
    }

    pub fn set_output_flags(&mut self, flags: OutputFlags) {
        self.0.c_oflag = flags.bits();
    }

    pub fn control_flags(&self) -> ControlFlags {
        ControlFlags::from_bits_retain(self.0.c_cflag)
    }

    pub fn set_control_flags(&mut self, flags: ControlFlags) {
        self.0.c_cflag = flags.bits();
    }

    pub fn local_flags(&self) -> LocalFlags {
        LocalFlags::from_bits_retain(self.0.c_lflag)
    }

    pub fn set_local_flags(&mut self, flags: LocalFlags) {
        self.0.c_lflag = flags.bits();
    }

    /// Control character slot, e.g. `libc::VINTR`
    pub fn control_char(&self, index: usize) -> libc::cc_t {
        self.0.c_cc[index]
    }

    pub fn set_control_char(&mut self, index: usize, value: libc::cc_t) {
        self.0.c_cc[index] = value;
    }

    /// Minimum byte count a non-canonical read waits for (`VMIN`)
    pub fn min_bytes(&self) -> libc::cc_t {
        self.control_char(libc::VMIN)
    }

    /// Inter-byte read timeout in deciseconds (`VTIME`)
    pub fn read_timeout(&self) -> libc::cc_t {
        self.control_char(libc::VTIME)
    }

    /// Derive the raw-mode attribute set from these attributes.
    ///
    /// Break, CR-to-NL mapping, parity checking, 8th-bit stripping and
    /// software flow control are turned off on input; output
    /// post-processing is turned off; characters are 8 bits wide; echo,
    /// canonical mode, extended input processing and signal keys are
    /// disabled. Reads return whatever is available (possibly nothing) once
    /// `read_timeout` deciseconds have passed.
    pub fn raw(&self, read_timeout: u8) -> Self {
        let mut raw = *self;

        raw.set_input_flags(
            self.input_flags()
                - (InputFlags::BRKINT
                    | InputFlags::ICRNL
                    | InputFlags::INPCK
                    | InputFlags::ISTRIP
                    | InputFlags::IXON),
        );
        raw.set_output_flags(self.output_flags() - OutputFlags::OPOST);
        raw.set_control_flags(self.control_flags() | ControlFlags::CS8);
        raw.set_local_flags(
            self.local_flags()
                - (LocalFlags::ECHO | LocalFlags::ICANON | LocalFlags::IEXTEN | LocalFlags::ISIG),
        );

        raw.set_control_char(libc::VMIN, 0);
        raw.set_control_char(libc::VTIME, read_timeout);
        raw
    }
}
