use std::any::Any;

use crate::error::MapError;

pub struct Failure {
    pub index: usize,
    pub payload: Box<dyn Any + Send>,
}

impl Failure {
    #[inline]
    pub fn new(index: usize, payload: Box<dyn Any + Send>) -> Self {
        Failure { index, payload }
    }

    pub fn message(&self) -> String {
        describe(&*self.payload)
    }

    pub fn into_error(self) -> MapError {
        MapError::TransformPanicked {
            index: self.index,
            message: self.message(),
        }
    }

    pub fn resume(self) -> ! {
        std::panic::resume_unwind(self.payload)
    }
}

pub fn describe(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Box<dyn Any>".to_string()
    }
}
