use super::{Field, FieldError, FieldKind};

impl Field for bool {
    fn kind(&self) -> FieldKind {
        FieldKind::Bool
    }

    fn set_zero(&mut self) {
        *self = false;
    }

    fn set_bool(&mut self, value: bool) -> Result<(), FieldError> {
        *self = value;
        Ok(())
    }
}

macro_rules! signed_field {
    ($($t:ty),*) => {$(
        impl Field for $t {
            fn kind(&self) -> FieldKind {
                FieldKind::Int
            }

            fn set_zero(&mut self) {
                *self = 0;
            }

            fn set_int(&mut self, value: i64) -> Result<(), FieldError> {
                *self = <$t>::try_from(value).map_err(|_| FieldError::OutOfRange)?;
                Ok(())
            }
        }
    )*};
}

macro_rules! unsigned_field {
    ($($t:ty),*) => {$(
        impl Field for $t {
            fn kind(&self) -> FieldKind {
                FieldKind::Uint
            }

            fn set_zero(&mut self) {
                *self = 0;
            }

            fn set_uint(&mut self, value: u64) -> Result<(), FieldError> {
                *self = <$t>::try_from(value).map_err(|_| FieldError::OutOfRange)?;
                Ok(())
            }
        }
    )*};
}

signed_field!(i8, i16, i32, i64, isize);
unsigned_field!(u8, u16, u32, u64, usize);

impl Field for f64 {
    fn kind(&self) -> FieldKind {
        FieldKind::Float
    }

    fn set_zero(&mut self) {
        *self = 0.0;
    }

    fn set_float(&mut self, value: f64) -> Result<(), FieldError> {
        *self = value;
        Ok(())
    }
}

impl Field for f32 {
    fn kind(&self) -> FieldKind {
        FieldKind::Float
    }

    fn set_zero(&mut self) {
        *self = 0.0;
    }

    fn set_float(&mut self, value: f64) -> Result<(), FieldError> {
        if value.is_finite() && value.abs() > f64::from(f32::MAX) {
            return Err(FieldError::OutOfRange);
        }
        *self = value as f32;
        Ok(())
    }
}

impl Field for String {
    fn kind(&self) -> FieldKind {
        FieldKind::String
    }

    fn set_zero(&mut self) {
        self.clear();
    }

    fn set_string(&mut self, value: &str) -> Result<(), FieldError> {
        self.clear();
        self.push_str(value);
        Ok(())
    }
}

impl<T: Field + Default> Field for Option<T> {
    fn kind(&self) -> FieldKind {
        FieldKind::Optional
    }

    fn set_zero(&mut self) {
        *self = None;
    }

    fn unwrap_optional(&mut self) -> Result<&mut dyn Field, FieldError> {
        Ok(self.get_or_insert_with(T::default) as &mut dyn Field)
    }
}

impl<T: Field + Default> Field for Vec<T> {
    fn kind(&self) -> FieldKind {
        FieldKind::Sequence
    }

    fn set_zero(&mut self) {
        self.clear();
    }

    fn set_sequence(&mut self, len: usize) -> Result<Vec<&mut dyn Field>, FieldError> {
        self.clear();
        self.resize_with(len, T::default);
        Ok(self.iter_mut().map(|item| item as &mut dyn Field).collect())
    }
}
