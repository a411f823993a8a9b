//! Nested collections of collidable objects.

/// A collection of objects and sub-groups. A group that does not exist is
/// skipped with everything inside it.
#[derive(Clone, Debug, PartialEq)]
pub struct Group<T> {
    pub exists: bool,
    pub members: Vec<Member<T>>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Member<T> {
    Object(T),
    Group(Group<T>),
}

impl<T> Default for Group<T> {
    fn default() -> Self {
        Self { exists: true, members: Vec::new() }
    }
}

impl<T> Group<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, obj: T) -> &mut Self {
        self.members.push(Member::Object(obj));
        self
    }

    pub fn add_group(&mut self, group: Group<T>) -> &mut Self {
        self.members.push(Member::Group(group));
        self
    }

    /// Objects in this group and every nested group, existing or not.
    pub fn len(&self) -> usize {
        self.members
            .iter()
            .map(|m| match m {
                Member::Object(_) => 1,
                Member::Group(g) => g.len(),
            })
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Visit objects depth-first, skipping groups that do not exist.
    pub fn for_each(&self, f: &mut impl FnMut(&T)) {
        if !self.exists {
            return;
        }
        for m in &self.members {
            match m {
                Member::Object(obj) => f(obj),
                Member::Group(g) => g.for_each(f),
            }
        }
    }

    pub fn for_each_mut(&mut self, f: &mut impl FnMut(&mut T)) {
        if !self.exists {
            return;
        }
        for m in &mut self.members {
            match m {
                Member::Object(obj) => f(obj),
                Member::Group(g) => g.for_each_mut(f),
            }
        }
    }

    pub fn collect<'a>(&'a self, out: &mut Vec<&'a T>) {
        if !self.exists {
            return;
        }
        for m in &self.members {
            match m {
                Member::Object(obj) => out.push(obj),
                Member::Group(g) => g.collect(out),
            }
        }
    }

    /// Flatten into disjoint mutable borrows, in depth-first order.
    pub fn collect_mut<'a>(&'a mut self, out: &mut Vec<&'a mut T>) {
        if !self.exists {
            return;
        }
        for m in &mut self.members {
            match m {
                Member::Object(obj) => out.push(obj),
                Member::Group(g) => g.collect_mut(out),
            }
        }
    }
}

impl<T> FromIterator<T> for Group<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self { exists: true, members: iter.into_iter().map(Member::Object).collect() }
    }
}

/// Borrowed view of a single object, a group or a slice.
#[derive(Debug)]
pub enum ObjectOrGroup<'a, T> {
    Object(&'a T),
    Group(&'a Group<T>),
    Many(&'a [T]),
}

impl<T> Clone for ObjectOrGroup<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ObjectOrGroup<'_, T> {}

impl<'a, T> ObjectOrGroup<'a, T> {
    pub fn collect(self, out: &mut Vec<&'a T>) {
        match self {
            ObjectOrGroup::Object(obj) => out.push(obj),
            ObjectOrGroup::Group(g) => g.collect(out),
            ObjectOrGroup::Many(objs) => out.extend(objs.iter()),
        }
    }
}

impl<'a, T> From<&'a Group<T>> for ObjectOrGroup<'a, T> {
    fn from(g: &'a Group<T>) -> Self {
        ObjectOrGroup::Group(g)
    }
}

impl<'a, T> From<&'a [T]> for ObjectOrGroup<'a, T> {
    fn from(objs: &'a [T]) -> Self {
        ObjectOrGroup::Many(objs)
    }
}

impl<'a, T> From<&'a Vec<T>> for ObjectOrGroup<'a, T> {
    fn from(objs: &'a Vec<T>) -> Self {
        ObjectOrGroup::Many(objs)
    }
}

/// Mutable counterpart of [`ObjectOrGroup`], used where objects get separated.
#[derive(Debug)]
pub enum ObjectOrGroupMut<'a, T> {
    Object(&'a mut T),
    Group(&'a mut Group<T>),
    Many(&'a mut [T]),
}

impl<'a, T> ObjectOrGroupMut<'a, T> {
    pub fn collect_mut(self, out: &mut Vec<&'a mut T>) {
        match self {
            ObjectOrGroupMut::Object(obj) => out.push(obj),
            ObjectOrGroupMut::Group(g) => g.collect_mut(out),
            ObjectOrGroupMut::Many(objs) => out.extend(objs.iter_mut()),
        }
    }
}

impl<'a, T> From<&'a mut Group<T>> for ObjectOrGroupMut<'a, T> {
    fn from(g: &'a mut Group<T>) -> Self {
        ObjectOrGroupMut::Group(g)
    }
}

impl<'a, T> From<&'a mut [T]> for ObjectOrGroupMut<'a, T> {
    fn from(objs: &'a mut [T]) -> Self {
        ObjectOrGroupMut::Many(objs)
    }
}

impl<'a, T> From<&'a mut Vec<T>> for ObjectOrGroupMut<'a, T> {
    fn from(objs: &'a mut Vec<T>) -> Self {
        ObjectOrGroupMut::Many(objs)
    }
}
