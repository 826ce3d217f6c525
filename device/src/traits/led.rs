/// A single-bit indicator output.
pub trait Led {
    type Error;

    fn set(&mut self, on: bool) -> Result<(), Self::Error>;

    fn state(&self) -> Result<bool, Self::Error>;

    fn on(&mut self) -> Result<(), Self::Error> {
        self.set(true)
    }

    fn off(&mut self) -> Result<(), Self::Error> {
        self.set(false)
    }

    fn toggle(&mut self) -> Result<(), Self::Error> {
        let state = self.state()?;
        self.set(!state)
    }
}
