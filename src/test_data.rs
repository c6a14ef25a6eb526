#[cfg(test)]
pub const BLOGML_SIMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<blog root-url="https://www.technologytoolbox.com/blog/jjameson/" date-created="2020-01-01T00:00:00" xmlns="http://www.blogml.com/2006/09/BlogML" xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <title type="text"><![CDATA[Technology Toolbox]]></title>
  <sub-title type="text"><![CDATA[Jeremy Jameson's blog]]></sub-title>
  <authors>
    <author id="2100" date-created="2007-12-09T00:00:00" approved="true" email="jeremy@example.com">
      <title type="text"><![CDATA[Jeremy Jameson]]></title>
    </author>
  </authors>
  <categories>
    <category id="1" date-created="2008-01-01T00:00:00" approved="true" parentref="0">
      <title type="text"><![CDATA[My System]]></title>
    </category>
    <category id="2" date-created="2008-01-01T00:00:00" approved="true" parentref="0">
      <title type="text"><![CDATA[SharePoint]]></title>
    </category>
  </categories>
  <posts>
    <post id="100" date-created="2020-01-02T10:00:00" date-modified="2020-01-02T10:00:00" approved="true" post-url="https://www.technologytoolbox.com/blog/jjameson/archive/2020/01/02/hello-world.aspx" type="normal" hasexcerpt="true" views="0" is-published="true">
      <title type="text"><![CDATA[Hello "World"]]></title>
      <post-name type="text"><![CDATA[hello-world]]></post-name>
      <content type="text"><![CDATA[<p>Hello <b>World </b>!</p>]]></content>
      <excerpt type="text"><![CDATA[A short excerpt]]></excerpt>
      <categories>
        <category ref="1" />
        <category ref="2" />
      </categories>
      <tags>
        <tag ref="Toolbox" />
        <tag ref="My System" />
      </tags>
      <comments>
        <comment id="5" date-created="2020-01-03T00:00:00" approved="true" user-name="Reader">
          <title type="text"><![CDATA[re: Hello World]]></title>
          <content type="text"><![CDATA[Nice post]]></content>
        </comment>
      </comments>
      <trackbacks />
      <authors>
        <author ref="2100" />
      </authors>
    </post>
    <post id="101" date-created="2012-02-19T15:30:00Z" date-modified="2012-02-20T10:00:00-07:00" approved="true" post-url="https://www.technologytoolbox.com/blog/jjameson/archive/2012/02/19/second-post.aspx" type="normal" hasexcerpt="false" views="0" is-published="true">
      <title type="text"><![CDATA[Second post]]></title>
      <content type="text">&lt;p&gt;See &lt;a href="/blog/jjameson/archive/2020/01/02/hello-world.aspx"&gt;the first post&lt;/a&gt;.&lt;/p&gt;</content>
      <categories>
        <category ref="2"></category>
      </categories>
      <authors>
        <author ref="2100" />
      </authors>
    </post>
  </posts>
</blog>
"#;

#[cfg(test)]
pub const BLOGML_BASE64: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<blog xmlns="http://www.blogml.com/2006/09/BlogML">
  <posts>
    <post id="1" date-created="2020-01-02T10:00:00" post-url="/blog/jjameson/archive/2020/01/02/encoded.aspx">
      <title type="text"><![CDATA[Encoded]]></title>
      <content type="base64"><![CDATA[PHA+SGVs
bG88L3A+]]></content>
    </post>
  </posts>
</blog>
"#;

/// Post whose content carries every construct the preprocessing rewrites.
#[cfg(test)]
pub const RICH_POST_HTML: &str = r#"<p>Run the following:</p>
<div class="consoleBlock">
  <kbd>cls</kbd><br />
  <kbd>dir</kbd></div>
<blockquote class="directQuote errorMessage">
  Access is
  denied.</blockquote>
<div class="image">
  <img src="https://www.technologytoolbox.com/blog/images/www_technologytoolbox_com/blog/jjameson/10/o_Taskbar-Shortcuts.jpg" alt="Taskbar shortcuts" height="96" width="301" />
  <div class="caption">Figure 1: Taskbar shortcuts</div>
</div>
<table>
  <caption>My Table</caption>
  <tr><td>A
    value</td></tr>
</table>
<p>Press <kbd>CTRL+C</kbd> to copy the <samp>Success</samp> message.</p>
<div class="reference">
  <cite>"Access is denied" error message</cite>
  <div class="referenceLink">
    <a href="http://support.microsoft.com/kb/867466">http://support.microsoft.com/kb/867466</a>
  </div>
</div>
<p>See <a href="https://www.technologytoolbox.com/blog/jjameson/archive/2020/01/02/hello-world.aspx">my first post</a>.</p>
<h3>
  Tags</h3>
<ul>
  <li><a href="/blog/jjameson/tags/Toolbox" rel="tag">Toolbox</a></li>
  <li><a href="/blog/jjameson/tags/My+System" rel="tag">My System</a></li>
</ul>
"#;
