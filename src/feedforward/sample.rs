use crate::algebra::{Field, Vector};

/// One labeled data sample: network inputs and the outputs it should produce.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample<T> {
    pub inputs: Vector<T>,
    pub desired_outputs: Vector<T>,
}

impl<T: Field> Sample<T> {
    pub fn new(inputs: Vector<T>, desired_outputs: Vector<T>) -> Self {
        Sample {
            inputs,
            desired_outputs,
        }
    }
}

impl<T: Field> From<(Vector<T>, Vector<T>)> for Sample<T> {
    fn from((inputs, desired_outputs): (Vector<T>, Vector<T>)) -> Self {
        Sample::new(inputs, desired_outputs)
    }
}

impl<T: Field> From<(Vec<T>, Vec<T>)> for Sample<T> {
    fn from((inputs, desired_outputs): (Vec<T>, Vec<T>)) -> Self {
        Sample::new(Vector::new(inputs), Vector::new(desired_outputs))
    }
}
