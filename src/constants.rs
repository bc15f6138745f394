// src/constants.rs

/// Name reported by SYST.
pub const SYSTEM_NAME: &str = "UNIX Type: L8";

/// Size reported by SIZE when the target is a directory.
pub const DIRECTORY_SIZE_PLACEHOLDER: u64 = 1024;

/// Reply codes used on the control connection.
pub mod status {
    pub const ALREADY_OPEN: u16 = 125;
    pub const ABOUT_TO_SEND: u16 = 150;

    pub const COMMAND_OK: u16 = 200;
    pub const SYSTEM: u16 = 211;
    pub const FILE: u16 = 213;
    pub const NAME_SYSTEM: u16 = 215;
    pub const READY: u16 = 220;
    pub const CLOSING: u16 = 221;
    pub const CLOSING_DATA_CONNECTION: u16 = 226;
    pub const PASSIVE_MODE: u16 = 227;
    pub const EXTENDED_PASSIVE_MODE: u16 = 229;
    pub const LOGGED_IN: u16 = 230;
    pub const REQUESTED_FILE_ACTION_OK: u16 = 250;
    pub const PATH_CREATED: u16 = 257;

    pub const USER_OK: u16 = 331;
    pub const REQUEST_FILE_PENDING: u16 = 350;

    pub const CANNOT_OPEN_DATA_CONNECTION: u16 = 425;
    pub const TRANSFER_ABORTED: u16 = 426;
    pub const FILE_ACTION_IGNORED: u16 = 450;
    pub const LOCAL_ERROR: u16 = 451;

    pub const BAD_ARGUMENTS: u16 = 501;
    pub const COMMAND_NOT_IMPLEMENTED: u16 = 502;
    pub const BAD_SEQUENCE: u16 = 503;
    pub const FILE_UNAVAILABLE: u16 = 550;

    /// Default text sent with a bare status code.
    pub fn message(code: u16) -> &'static str {
        match code {
            ALREADY_OPEN => "Data connection already open; transfer starting.",
            ABOUT_TO_SEND => "File status okay; about to open data connection.",
            COMMAND_OK => "Command okay.",
            SYSTEM => "System status, or system help reply.",
            FILE => "File status.",
            NAME_SYSTEM => super::SYSTEM_NAME,
            READY => "Service ready for new user.",
            CLOSING => "Service closing control connection.",
            CLOSING_DATA_CONNECTION => "Closing data connection.",
            PASSIVE_MODE => "Entering Passive Mode.",
            EXTENDED_PASSIVE_MODE => "Entering Extended Passive Mode.",
            LOGGED_IN => "User logged in, proceed.",
            REQUESTED_FILE_ACTION_OK => "Requested file action okay, completed.",
            PATH_CREATED => "Pathname created.",
            USER_OK => "User name okay, need password.",
            REQUEST_FILE_PENDING => "Requested file action pending further information.",
            CANNOT_OPEN_DATA_CONNECTION => "Can't open data connection.",
            TRANSFER_ABORTED => "Connection closed; transfer aborted.",
            FILE_ACTION_IGNORED => "Requested file action not taken.",
            LOCAL_ERROR => "Requested action aborted. Local error in processing.",
            BAD_ARGUMENTS => "Syntax error in parameters or arguments.",
            COMMAND_NOT_IMPLEMENTED => "Command not implemented.",
            BAD_SEQUENCE => "Bad sequence of commands.",
            FILE_UNAVAILABLE => "Requested action not taken. File unavailable.",
            _ => "",
        }
    }
}
