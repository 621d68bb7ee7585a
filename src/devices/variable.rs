//! Software-defined holding registers.
//!
//! A [`Variable`] binds a holding register to an external getter and an
//! optional setter, e.g. to expose a configuration value.  It holds no
//! state of its own: reads call the getter and truncate to 16 bits, writes
//! widen the register back to `T` and call the setter.  A variable without
//! a setter is read-only; one without a getter reads as [`INVALID_VALUE`].

use log::debug;

use super::{Device, DeviceContext, INVALID_VALUE, RegisterKind};

/// A value that can be carried by one 16-bit register.
pub trait RegisterValue: Copy {
    /// Truncate to the register width.
    fn to_register(self) -> u16;

    /// Widen a register value back to `Self`.
    fn from_register(raw: u16) -> Self;
}

macro_rules! impl_register_value {
    ($($t:ty),* $(,)?) => {
        $(
            impl RegisterValue for $t {
                fn to_register(self) -> u16 {
                    self as u16
                }

                fn from_register(raw: u16) -> Self {
                    raw as $t
                }
            }
        )*
    };
}

impl_register_value!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, f32, f64);

impl RegisterValue for bool {
    fn to_register(self) -> u16 {
        u16::from(self)
    }

    fn from_register(raw: u16) -> Self {
        raw != 0
    }
}

pub type Getter<T> = Box<dyn Fn() -> T>;
pub type Setter<T> = Box<dyn FnMut(T)>;

pub struct Variable<T: RegisterValue> {
    getter: Option<Getter<T>>,
    setter: Option<Setter<T>>,
}

impl<T: RegisterValue> Variable<T> {
    pub fn new(getter: Option<Getter<T>>, setter: Option<Setter<T>>) -> Self {
        Self { getter, setter }
    }

    pub fn read_only(getter: impl Fn() -> T + 'static) -> Self {
        Self::new(Some(Box::new(getter)), None)
    }

    pub fn read_write(getter: impl Fn() -> T + 'static, setter: impl FnMut(T) + 'static) -> Self {
        Self::new(Some(Box::new(getter)), Some(Box::new(setter)))
    }
}

impl<T: RegisterValue> Device for Variable<T> {
    fn kind(&self) -> RegisterKind {
        RegisterKind::HoldingRegister
    }

    fn word(&self) -> u16 {
        self.getter
            .as_ref()
            .map_or(INVALID_VALUE, |get| get().to_register())
    }

    fn set_word(&mut self, value: u16, _ctx: &mut DeviceContext<'_>) {
        match self.setter.as_mut() {
            Some(set) => {
                set(T::from_register(value));
                debug!("variable write: {}", value);
            }
            None => debug!("variable write ignored (read-only): {}", value),
        }
    }
}
