#[derive(Debug, Clone, PartialEq)]
pub enum AppMessage {
    Quit,
    Logout,

    // Playback
    TogglePlayPause,
    NextTrack,
    PreviousTrack,
    VolumeUp,
    VolumeDown,
    ToggleMute,
    SeekForward,
    SeekBackward,
    /// Seek to n tenths of the track.
    SeekToTenth(u8),
    ToggleShuffle,
    ToggleRepeat,

    // Navigation
    NextSurface,
    PreviousSurface,
}
