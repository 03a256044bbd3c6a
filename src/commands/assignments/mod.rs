mod assignment_list;
mod set_assignment;

pub fn commands() -> [crate::Command; 2] {
    [set_assignment::set_assignment(), assignment_list::assignment_list()]
}
