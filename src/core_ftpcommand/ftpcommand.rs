/// Commands the server dispatcher recognises.
#[derive(Eq, Hash, PartialEq, Debug, Clone, Copy)]
pub enum FtpCommand {
    USER,
    PASS,
    QUIT,
    REIN,
    PWD,
    CWD,
    CDUP,
    LIST,
    NLST,
    NOOP,
    MKD,
    RMD,
    XRMD,
    DELE,
    RNFR,
    RNTO,
    RETR,
    STOR,
    REST,
    SIZE,
    PASV,
    EPSV,
    FEAT,
    OPTS,
    SYST,
    TYPE,
}

impl FtpCommand {
    /// Case-insensitive lookup of a command token.
    pub fn parse(cmd: &str) -> Option<FtpCommand> {
        match cmd.to_ascii_uppercase().as_str() {
            "USER" => Some(FtpCommand::USER),
            "PASS" => Some(FtpCommand::PASS),
            "QUIT" => Some(FtpCommand::QUIT),
            "REIN" => Some(FtpCommand::REIN),
            "PWD" => Some(FtpCommand::PWD),
            "CWD" => Some(FtpCommand::CWD),
            "CDUP" => Some(FtpCommand::CDUP),
            "LIST" => Some(FtpCommand::LIST),
            "NLST" => Some(FtpCommand::NLST),
            "NOOP" => Some(FtpCommand::NOOP),
            "MKD" => Some(FtpCommand::MKD),
            "RMD" => Some(FtpCommand::RMD),
            "XRMD" => Some(FtpCommand::XRMD),
            "DELE" => Some(FtpCommand::DELE),
            "RNFR" => Some(FtpCommand::RNFR),
            "RNTO" => Some(FtpCommand::RNTO),
            "RETR" => Some(FtpCommand::RETR),
            "STOR" => Some(FtpCommand::STOR),
            "REST" => Some(FtpCommand::REST),
            "SIZE" => Some(FtpCommand::SIZE),
            "PASV" => Some(FtpCommand::PASV),
            "EPSV" => Some(FtpCommand::EPSV),
            "FEAT" => Some(FtpCommand::FEAT),
            "OPTS" => Some(FtpCommand::OPTS),
            "SYST" => Some(FtpCommand::SYST),
            "TYPE" => Some(FtpCommand::TYPE),
            _ => None,
        }
    }
}
