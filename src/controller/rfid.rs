// Command codes understood by the reader board firmware.
// The board drives its anticollision FSM from the digit it receives and echoes it back.

const COMMAND_BYTES: [(u8, Command); 5] = [
    (b'0', Command::Reqa),
    (b'1', Command::Wupa),
    (b'2', Command::Select),
    (b'3', Command::LongSelect),
    (b'4', Command::Halt),
];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Reqa,
    Wupa,
    Select,
    LongSelect,
    Halt,
}

impl Command {
    pub const ALL: [Command; 5] = [
        Command::Reqa,
        Command::Wupa,
        Command::Select,
        Command::LongSelect,
        Command::Halt,
    ];

    pub fn byte(self) -> u8 {
        self.into()
    }

    /// The command byte as it is shown in the log.
    pub fn code(self) -> char {
        char::from(self.byte())
    }

    pub fn label(self) -> &'static str {
        match self {
            Command::Reqa => "REQA (26)",
            Command::Wupa => "WUPA (52)",
            Command::Select => "Select (93 20)",
            Command::LongSelect => "Long Select",
            Command::Halt => "Halt",
        }
    }
}

impl From<Command> for u8 {
    fn from(command: Command) -> u8 {
        match command {
            Command::Reqa => b'0',
            Command::Wupa => b'1',
            Command::Select => b'2',
            Command::LongSelect => b'3',
            Command::Halt => b'4',
        }
    }
}

impl TryFrom<u8> for Command {
    type Error = u8;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        COMMAND_BYTES
            .iter()
            .find(|&&(associated, _)| associated == byte)
            .map(|&(_, command)| command)
            .ok_or(byte)
    }
}

impl core::fmt::Display for Command {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.label())
    }
}
