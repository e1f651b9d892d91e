/// Hitsound flags of a hit object.
pub trait HitSound: Copy {
    const WHISTLE: u8 = 1 << 1;
    const FINISH: u8 = 1 << 2;
    const CLAP: u8 = 1 << 3;

    fn whistle(self) -> bool;
    fn finish(self) -> bool;
    fn clap(self) -> bool;

    /// Whether a taiko note with this sound is a rim (kat) hit.
    #[inline]
    fn is_rim(self) -> bool {
        self.clap() || self.whistle()
    }
}

impl HitSound for u8 {
    #[inline]
    fn whistle(self) -> bool {
        self & Self::WHISTLE > 0
    }

    #[inline]
    fn finish(self) -> bool {
        self & Self::FINISH > 0
    }

    #[inline]
    fn clap(self) -> bool {
        self & Self::CLAP > 0
    }
}
